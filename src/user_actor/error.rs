use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("User already exists: {0}")]
    AlreadyExists(String),
    #[error("User validation error: {0}")]
    ValidationError(String),
    #[error("Backlog overflow for user {0}")]
    BacklogOverflow(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
