//! Lab operations - requests, technicians and the schedule that ties them.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use labdesk::lab::{LabOperations, RequestStatus, StatusExtras};
//! use labdesk::storage::InMemoryKeyValueStore;
//! use mockable::DefaultClock;
//!
//! let lab = LabOperations::open(InMemoryKeyValueStore::new(), Arc::new(DefaultClock));
//! lab.assign_request("LR-2025-001", "VALOR01")?;
//! lab.update_request_status("LR-2025-001", RequestStatus::Completed, StatusExtras::test_results("pass"))?;
//! let stats = lab.get_stats()?;
//! ```

pub mod fixtures;
mod operations;
mod request;
mod schedule;
mod stats;
mod technician;

pub use operations::{LabCollections, LabOperations, SharedClock};
pub use request::{
    clamp_progress, Priority, Request, RequestPatch, RequestStatus, StatusExtras,
    ASSIGNED_PROGRESS, COMPLETE_PROGRESS,
};
pub use schedule::{
    NewScheduleEntry, ScheduleEntry, SchedulePatch, ScheduleSequence, ScheduleStatus,
};
pub use stats::LabStats;
pub use technician::{Technician, TechnicianStatus};
