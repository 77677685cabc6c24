//! Append-only payment ledger.

pub mod entity;
pub mod error;

pub use error::*;
