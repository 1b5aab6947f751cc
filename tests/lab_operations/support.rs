//! Shared fixtures: a pinned clock and small seeded labs.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use labdesk::lab::{LabCollections, LabOperations, NewScheduleEntry, Request, SharedClock, Technician};
use labdesk::InMemoryKeyValueStore;
use mockable::Clock;

/// "Now" for every test in this suite.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap()
}

pub struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        now().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        now()
    }
}

pub fn clock() -> SharedClock {
    Arc::new(FixtureClock)
}

/// Starts at `now()` and only moves when told to.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(now())))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
}

/// `{id: LR-X, Pending, progress 0}`.
pub fn request_lr_x() -> Request {
    Request::new("LR-X", "Smart Plug SP-1", "EMC Testing", "Acme", date(2025, 3, 1))
}

pub fn valor01() -> Technician {
    Technician::new("VALOR01", "Dana Reyes", "EMC Testing")
}

/// A lab holding LR-X, VALOR01 and an empty schedule.
pub fn small_lab() -> (LabOperations<InMemoryKeyValueStore>, InMemoryKeyValueStore) {
    small_lab_with_clock(clock())
}

pub fn small_lab_with_clock(
    clock: SharedClock,
) -> (LabOperations<InMemoryKeyValueStore>, InMemoryKeyValueStore) {
    let backend = InMemoryKeyValueStore::new();
    let ops = LabOperations::seeded(
        backend.clone(),
        clock,
        LabCollections {
            requests: vec![request_lr_x()],
            technicians: vec![valor01()],
            schedule: vec![],
        },
    );
    (ops, backend)
}

/// A lab opened on the fixture data.
pub fn fixture_lab() -> LabOperations<InMemoryKeyValueStore> {
    LabOperations::open(InMemoryKeyValueStore::new(), clock())
}

pub fn slot(request_id: &str, technician_id: &str, day: u32) -> NewScheduleEntry {
    NewScheduleEntry {
        request_id: request_id.into(),
        product_name: "Smart Plug SP-1".into(),
        service_type: "EMC Testing".into(),
        technician_id: technician_id.into(),
        technician_name: "Dana Reyes".into(),
        start: at(day, 9),
        end: at(day, 17),
        status: Default::default(),
    }
}
