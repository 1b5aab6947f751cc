//! Handler: lab.queue

use serde_json::Value;

use crate::lab::LabOperations;
use crate::microsvc::{Context, HandlerError};
use crate::storage::KeyValueStore;

use super::respond;

pub const COMMAND: &str = "lab.queue";

pub fn guard<S>(_ctx: &Context<LabOperations<S>>) -> bool {
    true
}

pub fn handle<S: KeyValueStore>(ctx: &Context<LabOperations<S>>) -> Result<Value, HandlerError> {
    respond(&ctx.repo().queue()?)
}
