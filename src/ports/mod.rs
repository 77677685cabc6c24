//! Outbound ports: collaborators the rental lifecycle depends on but does not own.

pub mod clock;
pub mod moderation;
pub mod notify;
pub mod payment;

pub use clock::*;
pub use moderation::*;
pub use notify::*;
pub use payment::*;

use std::sync::Arc;

/// Bundle of collaborators handed to the lifecycle services.
#[derive(Clone)]
pub struct Ports {
    pub gateway: Arc<dyn PaymentGateway>,
    pub notifier: Arc<dyn Notifier>,
    pub moderation: Arc<dyn ModerationGate>,
    pub clock: Arc<dyn Clock>,
}
