use chrono::Duration;
use labdesk::lab::{LabOperations, RequestPatch, RequestStatus, StatusExtras};
use labdesk::LabError;

use crate::support::{clock, now, small_lab, small_lab_with_clock, ManualClock};

#[test]
fn completing_sets_full_progress_and_timestamp() {
    let (ops, _) = small_lab();
    ops.assign_request("LR-X", "VALOR01").unwrap();

    let request = ops
        .update_request_status(
            "LR-X",
            RequestStatus::Completed,
            StatusExtras::test_results("Conducted emissions pass"),
        )
        .unwrap()
        .unwrap();

    assert_eq!(request.progress, 100);
    assert_eq!(request.completed_at, Some(now()));
    assert_eq!(request.test_results.as_deref(), Some("Conducted emissions pass"));
}

#[test]
fn rejecting_records_reason_and_time() {
    let (ops, _) = small_lab();
    ops.assign_request("LR-X", "VALOR01").unwrap();

    let request = ops
        .update_request_status(
            "LR-X",
            RequestStatus::Rejected,
            StatusExtras::rejection_reason("Sample damaged in transit"),
        )
        .unwrap()
        .unwrap();

    assert_eq!(request.rejected_at, Some(now()));
    assert_eq!(request.rejection_reason.as_deref(), Some("Sample damaged in transit"));
}

#[test]
fn skipping_in_progress_is_illegal() {
    let (ops, _) = small_lab();

    let err = ops
        .update_request_status("LR-X", RequestStatus::Completed, StatusExtras::default())
        .unwrap_err();

    assert!(matches!(err, LabError::IllegalTransition { ref id, .. } if id == "LR-X"));
    let request = ops.request("LR-X").unwrap().unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert!(request.completed_at.is_none());
}

#[test]
fn progress_is_clamped() {
    let (ops, _) = small_lab();

    for (input, expected) in [(-20, 0), (0, 0), (63, 63), (100, 100), (1000, 100)] {
        let request = ops.update_request_progress("LR-X", input).unwrap().unwrap();
        assert_eq!(request.progress, expected, "progress {input}");
    }
}

#[test]
fn unknown_ids_are_silent() {
    let (ops, _) = small_lab();
    assert!(ops.update_request_progress("nope", 50).unwrap().is_none());
    assert!(ops
        .update_request_status("nope", RequestStatus::InProgress, StatusExtras::default())
        .unwrap()
        .is_none());
}

#[test]
fn patch_merges_fields() {
    let (ops, _) = small_lab();

    let request = ops
        .update_request(
            "LR-X",
            RequestPatch {
                notes: Some("Customer asked for expedited report".into()),
                customer: Some("Acme Labs".into()),
                ..RequestPatch::default()
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(request.customer, "Acme Labs");
    assert_eq!(request.notes.as_deref(), Some("Customer asked for expedited report"));
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(ops.requests_for_customer("Acme Labs").unwrap().len(), 1);
}

#[test]
fn reentering_in_progress_keeps_the_progress_floor() {
    let (ops, _) = small_lab();
    ops.assign_request("LR-X", "VALOR01").unwrap();
    ops.update_request_progress("LR-X", 60).unwrap();

    let request = ops
        .update_request_status("LR-X", RequestStatus::InProgress, StatusExtras::default())
        .unwrap()
        .unwrap();
    assert_eq!(request.progress, 60);

    ops.update_request_progress("LR-X", 0).unwrap();
    let request = ops
        .update_request_status("LR-X", RequestStatus::InProgress, StatusExtras::default())
        .unwrap()
        .unwrap();
    assert_eq!(request.status, RequestStatus::InProgress);
    assert_eq!(request.progress, 10);
}

#[test]
fn recompleting_restamps_completion() {
    let manual = ManualClock::new();
    let (ops, backend) = small_lab_with_clock(manual.clone());
    ops.assign_request("LR-X", "VALOR01").unwrap();
    ops.update_request_status("LR-X", RequestStatus::Completed, StatusExtras::test_results("pass"))
        .unwrap();

    manual.advance(Duration::days(2));
    let request = ops
        .update_request_status("LR-X", RequestStatus::Completed, StatusExtras::default())
        .unwrap()
        .unwrap();

    assert_eq!(request.completed_at, Some(now() + Duration::days(2)));
    assert_eq!(request.progress, 100);
    assert_eq!(request.test_results.as_deref(), Some("pass"));

    let reopened = LabOperations::open(backend, clock());
    assert_eq!(
        reopened.request("LR-X").unwrap().unwrap().completed_at,
        Some(now() + Duration::days(2))
    );
}

#[test]
fn patched_progress_is_clamped() {
    let (ops, backend) = small_lab();

    for (input, expected) in [(250, 100), (-7, 0), (42, 42)] {
        let request = ops
            .update_request(
                "LR-X",
                RequestPatch {
                    progress: Some(input),
                    ..RequestPatch::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(request.progress, expected, "progress {input}");
    }

    let reopened = LabOperations::open(backend, clock());
    assert_eq!(reopened.request("LR-X").unwrap().unwrap().progress, 42);
}
