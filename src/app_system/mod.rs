//! System orchestration, configuration, startup, and shutdown logic.

pub mod config;
pub mod rental_system;
pub mod tracing;

pub use config::*;
pub use rental_system::*;
pub use self::tracing::*;
