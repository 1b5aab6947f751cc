//! Handler: request.update

use serde::Deserialize;
use serde_json::Value;

use crate::lab::{LabOperations, RequestPatch};
use crate::microsvc::{Context, HandlerError};
use crate::storage::KeyValueStore;

use super::{found, respond};

pub const COMMAND: &str = "request.update";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
    #[serde(flatten)]
    pub patch: RequestPatch,
}

pub fn guard<S>(ctx: &Context<LabOperations<S>>) -> bool {
    ctx.has_text("id") && !ctx.has_field("status")
}

pub fn handle<S: KeyValueStore>(ctx: &Context<LabOperations<S>>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let request = ctx.repo().update_request(&input.id, input.patch)?;
    respond(&found(request, &input.id)?)
}
