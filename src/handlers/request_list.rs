//! Handler: request.list
//!
//! Filters are applied in order of precedence: `status`, then `customer`,
//! then `technicianId`. With none given, every request is returned.

use serde::Deserialize;
use serde_json::Value;

use crate::lab::{LabOperations, RequestStatus};
use crate::microsvc::{Context, HandlerError};
use crate::storage::KeyValueStore;

use super::respond;

pub const COMMAND: &str = "request.list";

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Input {
    pub status: Option<RequestStatus>,
    pub customer: Option<String>,
    pub technician_id: Option<String>,
}

pub fn guard<S>(ctx: &Context<LabOperations<S>>) -> bool {
    ctx.raw_input().is_object()
}

pub fn handle<S: KeyValueStore>(ctx: &Context<LabOperations<S>>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let ops = ctx.repo();
    let requests = match (input.status, input.customer, input.technician_id) {
        (Some(status), _, _) => ops.requests_with_status(status)?,
        (None, Some(customer), _) => ops.requests_for_customer(&customer)?,
        (None, None, Some(technician_id)) => ops.requests_for_technician(&technician_id)?,
        (None, None, None) => ops.requests()?,
    };
    respond(&requests)
}
