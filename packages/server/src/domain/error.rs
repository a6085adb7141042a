//! Domain-level error types.

use thiserror::Error;

/// Validation failure for a value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("value must not be empty")]
    Empty,
    #[error("value exceeds maximum length of {0} characters")]
    TooLong(usize),
}

/// Failure to push an event to a connection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventPushError {
    #[error("client '{0}' is not connected")]
    ClientNotFound(String),
    #[error("failed to push event: {0}")]
    PushFailed(String),
}
