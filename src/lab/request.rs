//! Lab requests: one test, calibration or certification job.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Collection;

/// Progress a request starts at once a technician picks it up.
pub const ASSIGNED_PROGRESS: u8 = 10;

/// Progress of a finished request.
pub const COMPLETE_PROGRESS: u8 = 100;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Lifecycle state of a request.
///
/// Legal moves are Pending → In Progress → {Completed, Rejected}. Staying
/// in the current state is always allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Rejected,
}

impl RequestStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::InProgress => "In Progress",
            RequestStatus::Completed => "Completed",
            RequestStatus::Rejected => "Rejected",
        }
    }

    /// Whether a request in this state may move to `next`.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        use RequestStatus::*;
        self == next
            || matches!(
                (self, next),
                (Pending, InProgress) | (InProgress, Completed) | (InProgress, Rejected)
            )
    }

    /// Pending or In Progress: still sitting in the lab queue.
    pub fn is_open(self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::InProgress)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Normal,
    High,
}

/// A lab test request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: String,
    pub product_name: String,
    pub service_type: String,
    /// Submission date.
    pub date: NaiveDate,
    pub status: RequestStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub progress: u8,
    pub customer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_results: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl Collection for Request {
    const KEY: &'static str = "lab_requests";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Request {
    /// A fresh Pending request with no technician and zero progress.
    pub fn new(
        id: impl Into<String>,
        product_name: impl Into<String>,
        service_type: impl Into<String>,
        customer: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            product_name: product_name.into(),
            service_type: service_type.into(),
            date,
            status: RequestStatus::Pending,
            priority: Priority::Normal,
            assigned_to: None,
            progress: 0,
            customer: customer.into(),
            notes: None,
            completed_at: None,
            test_results: None,
            rejected_at: None,
            rejection_reason: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Days between submission and completion, for completed requests.
    pub fn turnaround_days(&self) -> Option<f64> {
        if self.status != RequestStatus::Completed {
            return None;
        }
        let completed_at = self.completed_at?;
        let submitted = self.date.and_hms_opt(0, 0, 0)?.and_utc();
        let seconds = (completed_at - submitted).num_seconds();
        Some(seconds as f64 / SECONDS_PER_DAY)
    }

    pub(crate) fn assign_to(&mut self, technician_id: &str) {
        self.status = RequestStatus::InProgress;
        self.progress = ASSIGNED_PROGRESS;
        self.assigned_to = Some(technician_id.to_string());
    }

    /// Move to `status`, deriving the fields that go with it.
    ///
    /// The caller has already checked the transition is legal.
    pub(crate) fn apply_status(
        &mut self,
        status: RequestStatus,
        extras: StatusExtras,
        now: DateTime<Utc>,
    ) {
        extras.apply(self);
        self.status = status;
        match status {
            RequestStatus::Completed => {
                self.progress = COMPLETE_PROGRESS;
                self.completed_at = Some(now);
            }
            RequestStatus::Rejected => self.rejected_at = Some(now),
            RequestStatus::InProgress => self.progress = self.progress.max(ASSIGNED_PROGRESS),
            RequestStatus::Pending => {}
        }
    }
}

/// Clamp an arbitrary progress value into 0..=100.
pub fn clamp_progress(progress: i64) -> u8 {
    // Clamped into 0..=100, so the cast cannot truncate.
    progress.clamp(0, i64::from(COMPLETE_PROGRESS)) as u8
}

/// Partial update merged into a request by [`update_request`].
///
/// Status is absent: it only moves through `update_request_status`,
/// which checks the transition.
///
/// [`update_request`]: crate::lab::LabOperations::update_request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestPatch {
    pub product_name: Option<String>,
    pub service_type: Option<String>,
    pub date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub progress: Option<i64>,
    pub customer: Option<String>,
    pub notes: Option<String>,
    pub test_results: Option<String>,
}

impl RequestPatch {
    pub(crate) fn apply(self, request: &mut Request) {
        if let Some(product_name) = self.product_name {
            request.product_name = product_name;
        }
        if let Some(service_type) = self.service_type {
            request.service_type = service_type;
        }
        if let Some(date) = self.date {
            request.date = date;
        }
        if let Some(priority) = self.priority {
            request.priority = priority;
        }
        if let Some(progress) = self.progress {
            request.progress = clamp_progress(progress);
        }
        if let Some(customer) = self.customer {
            request.customer = customer;
        }
        if self.notes.is_some() {
            request.notes = self.notes;
        }
        if self.test_results.is_some() {
            request.test_results = self.test_results;
        }
    }
}

/// Extra fields recorded alongside a status change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusExtras {
    pub notes: Option<String>,
    pub test_results: Option<String>,
    pub rejection_reason: Option<String>,
}

impl StatusExtras {
    pub fn test_results(results: impl Into<String>) -> Self {
        Self {
            test_results: Some(results.into()),
            ..Self::default()
        }
    }

    pub fn rejection_reason(reason: impl Into<String>) -> Self {
        Self {
            rejection_reason: Some(reason.into()),
            ..Self::default()
        }
    }

    fn apply(self, request: &mut Request) {
        if self.notes.is_some() {
            request.notes = self.notes;
        }
        if self.test_results.is_some() {
            request.test_results = self.test_results;
        }
        if self.rejection_reason.is_some() {
            request.rejection_reason = self.rejection_reason;
        }
    }
}
