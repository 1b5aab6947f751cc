//! Handler: schedule.list

use serde::Deserialize;
use serde_json::Value;

use crate::lab::LabOperations;
use crate::microsvc::{Context, HandlerError};
use crate::storage::KeyValueStore;

use super::respond;

pub const COMMAND: &str = "schedule.list";

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Input {
    /// Restrict to one technician's slots, ordered by start time.
    pub technician_id: Option<String>,
}

pub fn guard<S>(ctx: &Context<LabOperations<S>>) -> bool {
    ctx.raw_input().is_object()
}

pub fn handle<S: KeyValueStore>(ctx: &Context<LabOperations<S>>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let entries = match input.technician_id {
        Some(technician_id) => ctx.repo().schedule_for_technician(&technician_id)?,
        None => ctx.repo().schedule()?,
    };
    respond(&entries)
}
