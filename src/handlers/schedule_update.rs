//! Handler: schedule.update

use serde::Deserialize;
use serde_json::Value;

use crate::lab::{LabOperations, SchedulePatch};
use crate::microsvc::{Context, HandlerError};
use crate::storage::KeyValueStore;

use super::{found, respond};

pub const COMMAND: &str = "schedule.update";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
    #[serde(flatten)]
    pub patch: SchedulePatch,
}

pub fn guard<S>(ctx: &Context<LabOperations<S>>) -> bool {
    ctx.has_text("id")
}

pub fn handle<S: KeyValueStore>(ctx: &Context<LabOperations<S>>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let entry = ctx.repo().update_schedule_item(&input.id, input.patch)?;
    respond(&found(entry, &input.id)?)
}
