//! Order lifecycle services: everything past the plain record actors.
//!
//! Flow: [`EligibilityGate`] admits a reservation (driven by
//! `OrderClient::create_order`), [`PaymentReconciler`] and
//! [`ExpirationScheduler`] race for the unpaid order, and
//! [`ReturnSettlement`] closes the rental and records late fees as backlog.

pub mod eligibility;
pub mod expiration;
pub mod reconciler;
pub mod settlement;

pub use eligibility::*;
pub use expiration::*;
pub use reconciler::*;
pub use settlement::*;
