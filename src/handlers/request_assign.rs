//! Handler: request.assign

use serde::Deserialize;
use serde_json::Value;

use crate::lab::LabOperations;
use crate::microsvc::{Context, HandlerError};
use crate::storage::KeyValueStore;

use super::{found, respond};

pub const COMMAND: &str = "request.assign";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub request_id: String,
    pub technician_id: String,
}

pub fn guard<S>(ctx: &Context<LabOperations<S>>) -> bool {
    ctx.has_text("requestId") && ctx.has_text("technicianId")
}

pub fn handle<S: KeyValueStore>(ctx: &Context<LabOperations<S>>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let request = ctx
        .repo()
        .assign_request(&input.request_id, &input.technician_id)?;
    respond(&found(
        request,
        &format!("{} or {}", input.request_id, input.technician_id),
    )?)
}
