use thiserror::Error;

use crate::lab::RequestStatus;

/// Errors returned by lab store operations.
///
/// Unknown ids are not errors: operations report them as `None` / `false`.
/// Storage write failures are logged by the persistence layer and never
/// reach this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabError {
    #[error("lab store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("request {id} cannot move from {from} to {to}")]
    IllegalTransition {
        id: String,
        from: RequestStatus,
        to: RequestStatus,
    },
    #[error("schedule slot for request {request_id} ends before it starts")]
    InvertedSlot { request_id: String },
}
