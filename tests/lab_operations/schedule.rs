use labdesk::lab::{
    LabCollections, LabOperations, RequestStatus, ScheduleEntry, SchedulePatch, ScheduleStatus,
};
use labdesk::storage::{Collection, KeyValueStore};
use labdesk::{InMemoryKeyValueStore, LabError};

use crate::support::{at, clock, fixture_lab, slot, small_lab};

#[test]
fn ids_count_up_from_an_empty_schedule() {
    let (ops, _) = small_lab();

    let first = ops.add_schedule_item(slot("LR-X", "VALOR01", 21)).unwrap();
    let second = ops.add_schedule_item(slot("LR-X", "VALOR01", 22)).unwrap();

    assert_eq!(first.id, "SCH-001");
    assert_eq!(second.id, "SCH-002");
    assert_eq!(ops.schedule().unwrap().len(), 2);
}

#[test]
fn sequence_resumes_after_highest_existing_id() {
    let ops = fixture_lab();
    let entry = ops
        .add_schedule_item(slot("LR-2025-003", "VALOR03", 24))
        .unwrap();
    assert_eq!(entry.id, "SCH-002");
}

#[test]
fn scheduling_an_unassigned_request_assigns_it() {
    let (ops, _) = small_lab();

    ops.add_schedule_item(slot("LR-X", "VALOR01", 21)).unwrap();

    let request = ops.request("LR-X").unwrap().unwrap();
    assert_eq!(request.status, RequestStatus::InProgress);
    assert_eq!(request.assigned_to.as_deref(), Some("VALOR01"));
    assert!(!ops.technician("VALOR01").unwrap().unwrap().is_available());
}

#[test]
fn scheduling_keeps_an_existing_assignment() {
    let ops = fixture_lab();

    ops.add_schedule_item(slot("LR-2025-002", "VALOR01", 21))
        .unwrap();

    let request = ops.request("LR-2025-002").unwrap().unwrap();
    assert_eq!(request.assigned_to.as_deref(), Some("VALOR02"));
    assert!(ops.technician("VALOR01").unwrap().unwrap().is_available());
}

#[test]
fn entries_can_be_rescheduled_and_completed() {
    let (ops, _) = small_lab();
    let entry = ops.add_schedule_item(slot("LR-X", "VALOR01", 21)).unwrap();

    let updated = ops
        .update_schedule_item(
            &entry.id,
            SchedulePatch {
                start: Some(at(25, 8)),
                end: Some(at(25, 12)),
                status: Some(ScheduleStatus::Completed),
                ..SchedulePatch::default()
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.start, at(25, 8));
    assert_eq!(updated.status, ScheduleStatus::Completed);
    assert_eq!(updated.technician_id, "VALOR01");
    assert!(ops
        .update_schedule_item("SCH-999", SchedulePatch::default())
        .unwrap()
        .is_none());
}

#[test]
fn slots_must_not_end_before_they_start() {
    let (ops, _) = small_lab();
    let mut backwards = slot("LR-X", "VALOR01", 21);
    backwards.end = at(20, 9);

    let err = ops.add_schedule_item(backwards).unwrap_err();
    assert!(matches!(err, LabError::InvertedSlot { ref request_id } if request_id == "LR-X"));
    assert!(ops.schedule().unwrap().is_empty());

    let entry = ops.add_schedule_item(slot("LR-X", "VALOR01", 21)).unwrap();
    assert_eq!(entry.id, "SCH-001");
    let err = ops
        .update_schedule_item(
            &entry.id,
            SchedulePatch {
                start: Some(at(22, 9)),
                ..SchedulePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, LabError::InvertedSlot { .. }));
    assert_eq!(ops.schedule().unwrap(), vec![entry]);
}

#[test]
fn huge_stored_id_does_not_break_the_sequence() {
    let (seeded, backend) = small_lab();
    let entry = seeded.add_schedule_item(slot("LR-X", "VALOR01", 21)).unwrap();
    let stored = ScheduleEntry {
        id: "SCH-4294967295".into(),
        ..entry
    };
    backend
        .write(ScheduleEntry::KEY, serde_json::to_string(&vec![stored]).unwrap())
        .unwrap();

    let ops = LabOperations::open(backend, clock());
    let next = ops.add_schedule_item(slot("LR-X", "VALOR01", 22)).unwrap();

    assert_eq!(next.id, "SCH-4294967296");
}

#[test]
fn delete_reports_whether_entry_existed() {
    let (ops, _) = small_lab();
    let entry = ops.add_schedule_item(slot("LR-X", "VALOR01", 21)).unwrap();

    assert!(ops.delete_schedule_item(&entry.id).unwrap());
    assert!(!ops.delete_schedule_item(&entry.id).unwrap());
    assert!(ops.schedule().unwrap().is_empty());
}

#[test]
fn technician_schedule_is_ordered_by_start() {
    let ops = LabOperations::seeded(
        InMemoryKeyValueStore::new(),
        clock(),
        LabCollections::default(),
    );
    ops.add_schedule_item(slot("LR-A", "VALOR01", 27)).unwrap();
    ops.add_schedule_item(slot("LR-B", "VALOR03", 22)).unwrap();
    ops.add_schedule_item(slot("LR-C", "VALOR01", 23)).unwrap();

    let ids: Vec<String> = ops
        .schedule_for_technician("VALOR01")
        .unwrap()
        .into_iter()
        .map(|e| e.request_id)
        .collect();
    assert_eq!(ids, vec!["LR-C", "LR-A"]);
}
