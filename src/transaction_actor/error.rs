use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransactionError {
    #[error("Transaction not found: {0}")]
    NotFound(String),
    #[error("Transaction already exists: {0}")]
    AlreadyExists(String),
    #[error("Transaction key does not match its payload: {0}")]
    KeyMismatch(String),
    #[error("Transactions are immutable: {0}")]
    Immutable(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
