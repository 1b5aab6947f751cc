//! Command handlers over the lab store, one file per command.

use serde::Serialize;
use serde_json::Value;

use crate::lab::LabOperations;
use crate::microsvc::{HandlerError, Service};
use crate::storage::KeyValueStore;

pub mod lab_queue;
pub mod lab_stats;
pub mod request_assign;
pub mod request_list;
pub mod request_progress;
pub mod request_status;
pub mod request_update;
pub mod schedule_add;
pub mod schedule_delete;
pub mod schedule_list;
pub mod schedule_update;
pub mod technician_status;

/// A service with every lab command registered.
pub fn lab_service<S>(ops: LabOperations<S>) -> Service<LabOperations<S>>
where
    S: KeyValueStore + 'static,
{
    crate::register_handlers!(
        Service::new(ops),
        [S] request_update,
        [S] request_assign,
        [S] request_status,
        [S] request_progress,
        [S] request_list,
        [S] technician_status,
        [S] schedule_add,
        [S] schedule_update,
        [S] schedule_delete,
        [S] schedule_list,
        [S] lab_stats,
        [S] lab_queue,
    )
}

fn respond<T: Serialize>(value: &T) -> Result<Value, HandlerError> {
    serde_json::to_value(value).map_err(|e| HandlerError::Internal(e.to_string()))
}

fn found<T>(value: Option<T>, id: &str) -> Result<T, HandlerError> {
    value.ok_or_else(|| HandlerError::NotFound(id.to_string()))
}
