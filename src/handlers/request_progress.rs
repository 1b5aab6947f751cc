//! Handler: request.progress

use serde::Deserialize;
use serde_json::Value;

use crate::lab::LabOperations;
use crate::microsvc::{Context, HandlerError};
use crate::storage::KeyValueStore;

use super::{found, respond};

pub const COMMAND: &str = "request.progress";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
    /// Clamped into 0..=100 by the store.
    pub progress: i64,
}

pub fn guard<S>(ctx: &Context<LabOperations<S>>) -> bool {
    ctx.has_text("id") && ctx.has_field("progress")
}

pub fn handle<S: KeyValueStore>(ctx: &Context<LabOperations<S>>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let request = ctx
        .repo()
        .update_request_progress(&input.id, input.progress)?;
    respond(&found(request, &input.id)?)
}
