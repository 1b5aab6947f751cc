//! Schedule entries: a technician booked against a request for a time slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Collection;

const ID_PREFIX: &str = "SCH-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScheduleStatus {
    #[default]
    Scheduled,
    Completed,
}

/// A booked slot. Product, service and technician name are copied at
/// creation and not kept in sync with the request or technician.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: String,
    pub request_id: String,
    pub product_name: String,
    pub service_type: String,
    pub technician_id: String,
    pub technician_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub status: ScheduleStatus,
}

impl Collection for ScheduleEntry {
    const KEY: &'static str = "lab_schedule";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for `add_schedule_item`; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduleEntry {
    pub request_id: String,
    pub product_name: String,
    pub service_type: String,
    pub technician_id: String,
    pub technician_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub status: ScheduleStatus,
}

impl NewScheduleEntry {
    pub(crate) fn into_entry(self, id: String) -> ScheduleEntry {
        ScheduleEntry {
            id,
            request_id: self.request_id,
            product_name: self.product_name,
            service_type: self.service_type,
            technician_id: self.technician_id,
            technician_name: self.technician_name,
            start: self.start,
            end: self.end,
            status: self.status,
        }
    }
}

/// Partial update for reschedule / reassign / complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulePatch {
    pub technician_id: Option<String>,
    pub technician_name: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub status: Option<ScheduleStatus>,
}

impl SchedulePatch {
    pub(crate) fn apply(self, entry: &mut ScheduleEntry) {
        if let Some(technician_id) = self.technician_id {
            entry.technician_id = technician_id;
        }
        if let Some(technician_name) = self.technician_name {
            entry.technician_name = technician_name;
        }
        if let Some(start) = self.start {
            entry.start = start;
        }
        if let Some(end) = self.end {
            entry.end = end;
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
    }
}

/// Monotonic `SCH-NNN` id source.
///
/// Seeded one past the highest id already present, and never handed back
/// after a delete. Saturates at `u64::MAX` instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSequence {
    next: u64,
}

impl ScheduleSequence {
    pub fn from_entries(entries: &[ScheduleEntry]) -> Self {
        let highest = entries
            .iter()
            .filter_map(|entry| parse_sequence(&entry.id))
            .max()
            .unwrap_or(0);
        Self {
            next: highest.saturating_add(1),
        }
    }

    /// Hand out the next id and advance.
    pub fn next_id(&mut self) -> String {
        let id = format!("{ID_PREFIX}{:03}", self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

fn parse_sequence(id: &str) -> Option<u64> {
    id.strip_prefix(ID_PREFIX)?.parse().ok()
}
