//! Seed data used when nothing has been persisted yet.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use super::request::{Priority, Request, RequestStatus};
use super::schedule::{ScheduleEntry, ScheduleStatus};
use super::technician::{Technician, TechnicianStatus};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn technicians() -> Vec<Technician> {
    let mut busy = Technician::new("VALOR02", "Priya Natarajan", "Safety Testing");
    busy.status = TechnicianStatus::Busy;
    vec![
        Technician::new("VALOR01", "Dana Reyes", "EMC Testing"),
        busy,
        Technician::new("VALOR03", "Marcus Hale", "Calibration"),
        Technician::new("VALOR04", "Sam Okafor", "RF Testing"),
    ]
}

pub fn requests() -> Vec<Request> {
    let pending = Request::new(
        "LR-2025-001",
        "Smart Thermostat T-200",
        "EMC Testing",
        "Northwind Devices",
        date(2025, 3, 3),
    )
    .with_priority(Priority::High);

    let mut in_progress = Request::new(
        "LR-2025-002",
        "Industrial Power Supply PS-48",
        "Safety Testing",
        "Helix Power",
        date(2025, 2, 26),
    );
    in_progress.status = RequestStatus::InProgress;
    in_progress.assigned_to = Some("VALOR02".into());
    in_progress.progress = 45;

    let calibration = Request::new(
        "LR-2025-003",
        "Digital Multimeter DM-7",
        "Calibration",
        "Orbit Instruments",
        date(2025, 3, 5),
    );

    let mut completed = Request::new(
        "LR-2025-004",
        "Bluetooth Speaker BX-1",
        "RF Testing",
        "Lumen Audio",
        date(2025, 2, 10),
    );
    completed.status = RequestStatus::Completed;
    completed.assigned_to = Some("VALOR04".into());
    completed.progress = 100;
    completed.completed_at = Some(at(2025, 2, 14, 16));
    completed.test_results = Some("Radiated emissions within FCC Part 15 limits".into());

    let mut rejected = Request::new(
        "LR-2025-005",
        "USB-C Charger QC-65",
        "Safety Testing",
        "Voltix",
        date(2025, 2, 18),
    );
    rejected.status = RequestStatus::Rejected;
    rejected.rejected_at = Some(at(2025, 2, 19, 10));
    rejected.rejection_reason = Some("Missing schematic and bill of materials".into());

    vec![pending, in_progress, calibration, completed, rejected]
}

pub fn schedule() -> Vec<ScheduleEntry> {
    vec![ScheduleEntry {
        id: "SCH-001".into(),
        request_id: "LR-2025-002".into(),
        product_name: "Industrial Power Supply PS-48".into(),
        service_type: "Safety Testing".into(),
        technician_id: "VALOR02".into(),
        technician_name: "Priya Natarajan".into(),
        start: at(2025, 3, 10, 9),
        end: at(2025, 3, 12, 17),
        status: ScheduleStatus::Scheduled,
    }]
}
