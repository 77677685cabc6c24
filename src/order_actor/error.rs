use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Order already exists: {0}")]
    AlreadyExists(String),
    #[error("Order total does not match its components: {0}")]
    PriceMismatch(String),
    #[error("Order already paid: {0}")]
    AlreadyPaid(String),
    #[error("Order not paid: {0}")]
    NotPaid(String),
    #[error("Order not picked up: {0}")]
    NotPickedUp(String),
    #[error("Order already picked up: {0}")]
    AlreadyPickedUp(String),
    #[error("Order already returned: {0}")]
    AlreadyReturned(String),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
