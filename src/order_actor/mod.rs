//! Order records and their payment, pickup and return transitions.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
