//! Dashboard statistics derived from the request collection.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::request::{Request, RequestStatus};

/// Window counted as "this week".
const COMPLETED_WINDOW_DAYS: i64 = 7;

/// Derived counts; recomputed on every call, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabStats {
    pub pending_requests: usize,
    pub active_tests: usize,
    pub completed_this_week: usize,
    /// Mean submission-to-completion time, e.g. `"3.5d"`.
    pub avg_turnaround: String,
}

impl LabStats {
    pub fn compute(requests: &[Request], now: DateTime<Utc>) -> Self {
        let week_start = now - Duration::days(COMPLETED_WINDOW_DAYS);

        let pending_requests = count_status(requests, RequestStatus::Pending);
        let active_tests = count_status(requests, RequestStatus::InProgress);
        let completed_this_week = requests
            .iter()
            .filter(|r| r.status == RequestStatus::Completed)
            .filter(|r| r.completed_at.is_some_and(|at| at >= week_start))
            .count();

        let turnarounds: Vec<f64> = requests.iter().filter_map(Request::turnaround_days).collect();
        let avg = if turnarounds.is_empty() {
            0.0
        } else {
            turnarounds.iter().sum::<f64>() / turnarounds.len() as f64
        };

        Self {
            pending_requests,
            active_tests,
            completed_this_week,
            avg_turnaround: format!("{avg:.1}d"),
        }
    }
}

fn count_status(requests: &[Request], status: RequestStatus) -> usize {
    requests.iter().filter(|r| r.status == status).count()
}
