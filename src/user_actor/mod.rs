//! User records: KYC/premium flags, backlog accounting, active rentals and the inbox.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
