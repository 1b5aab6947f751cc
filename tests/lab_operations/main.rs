//! Lab operations store integration tests.

mod support;
mod status;
mod schedule;
mod persistence;

#[cfg(feature = "emitter")]
mod notifications;
