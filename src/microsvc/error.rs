//! Error types for command handlers.

use thiserror::Error;

use crate::error::LabError;

/// Error type for command handler operations.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// No handler registered for this command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("decode failed: {0}")]
    DecodeFailed(String),
    /// The lab store refused the command (e.g. an illegal status change).
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Guard rejected the command (input validation failed).
    #[error("guard rejected command: {0}")]
    GuardRejected(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<LabError> for HandlerError {
    fn from(err: LabError) -> Self {
        match err {
            LabError::IllegalTransition { .. } | LabError::InvertedSlot { .. } => {
                HandlerError::Rejected(err.to_string())
            }
            LabError::LockPoisoned(_) => HandlerError::Internal(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl HandlerError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::Rejected(_) => 422,
            HandlerError::NotFound(_) => 404,
            HandlerError::GuardRejected(_) => 400,
            HandlerError::Internal(_) => 500,
        }
    }
}
