//! Handler: schedule.add

use serde_json::Value;

use crate::lab::{LabOperations, NewScheduleEntry};
use crate::microsvc::{Context, HandlerError};
use crate::storage::KeyValueStore;

use super::respond;

pub const COMMAND: &str = "schedule.add";

pub fn guard<S>(ctx: &Context<LabOperations<S>>) -> bool {
    ctx.has_text("requestId")
        && ctx.has_text("technicianId")
        && ctx.has_fields(&["start", "end"])
}

pub fn handle<S: KeyValueStore>(ctx: &Context<LabOperations<S>>) -> Result<Value, HandlerError> {
    let input = ctx.input::<NewScheduleEntry>()?;
    let entry = ctx.repo().add_schedule_item(input)?;
    respond(&entry)
}
