//! Handler: schedule.delete

use serde::Deserialize;
use serde_json::{json, Value};

use crate::lab::LabOperations;
use crate::microsvc::{Context, HandlerError};
use crate::storage::KeyValueStore;

pub const COMMAND: &str = "schedule.delete";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
}

pub fn guard<S>(ctx: &Context<LabOperations<S>>) -> bool {
    ctx.has_text("id")
}

pub fn handle<S: KeyValueStore>(ctx: &Context<LabOperations<S>>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    if !ctx.repo().delete_schedule_item(&input.id)? {
        return Err(HandlerError::NotFound(input.id));
    }
    Ok(json!({ "id": input.id, "deleted": true }))
}
