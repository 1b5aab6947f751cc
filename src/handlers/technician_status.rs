//! Handler: technician.status

use serde::Deserialize;
use serde_json::Value;

use crate::lab::{LabOperations, TechnicianStatus};
use crate::microsvc::{Context, HandlerError};
use crate::storage::KeyValueStore;

use super::{found, respond};

pub const COMMAND: &str = "technician.status";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
    pub status: TechnicianStatus,
}

pub fn guard<S>(ctx: &Context<LabOperations<S>>) -> bool {
    ctx.has_text("id") && ctx.has_text("status")
}

pub fn handle<S: KeyValueStore>(ctx: &Context<LabOperations<S>>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let technician = ctx
        .repo()
        .update_technician_status(&input.id, input.status)?;
    respond(&found(technician, &input.id)?)
}
