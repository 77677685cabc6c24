pub mod user;
pub mod product;
pub mod order;
pub mod transaction;

pub use user::*;
pub use product::*;
pub use order::*;
pub use transaction::*;

/// Amount in minor currency units (paise, cents).
pub type Money = u64;
