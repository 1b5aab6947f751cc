//! Handler: request.status

use serde::Deserialize;
use serde_json::Value;

use crate::lab::{LabOperations, RequestStatus, StatusExtras};
use crate::microsvc::{Context, HandlerError};
use crate::storage::KeyValueStore;

use super::{found, respond};

pub const COMMAND: &str = "request.status";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
    pub status: RequestStatus,
    #[serde(flatten)]
    pub extras: StatusExtras,
}

pub fn guard<S>(ctx: &Context<LabOperations<S>>) -> bool {
    ctx.has_text("id") && ctx.has_text("status")
}

pub fn handle<S: KeyValueStore>(ctx: &Context<LabOperations<S>>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let request = ctx
        .repo()
        .update_request_status(&input.id, input.status, input.extras)?;
    respond(&found(request, &input.id)?)
}
