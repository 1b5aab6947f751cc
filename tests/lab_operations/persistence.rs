use labdesk::lab::{LabCollections, LabOperations, Request, ScheduleEntry, Technician};
use labdesk::storage::{Collection, FileKeyValueStore, KeyValueStore, PersistentStore};
use labdesk::InMemoryKeyValueStore;

use crate::support::{clock, request_lr_x, slot, small_lab, valor01};

#[test]
fn saved_collection_loads_back_equal() {
    let store = PersistentStore::new(InMemoryKeyValueStore::new());
    let requests = labdesk::lab::fixtures::requests();

    store.batch().collection(&requests).commit().unwrap();
    let loaded: Vec<Request> = store.load_collection(Vec::new());

    assert_eq!(loaded, requests);
}

#[test]
fn collections_use_their_own_keys() {
    let (ops, backend) = small_lab();
    ops.assign_request("LR-X", "VALOR01").unwrap();

    for key in [Request::KEY, Technician::KEY, ScheduleEntry::KEY] {
        assert!(backend.read(key).unwrap().is_some(), "{key} missing");
    }
    let raw = backend.read("lab_requests").unwrap().unwrap();
    assert!(raw.contains("\"status\":\"In Progress\""));
}

#[test]
fn reopening_sees_committed_changes() {
    let (ops, backend) = small_lab();
    ops.assign_request("LR-X", "VALOR01").unwrap();
    ops.add_schedule_item(slot("LR-X", "VALOR01", 21)).unwrap();
    let before = ops.snapshot().unwrap();
    drop(ops);

    let reopened = LabOperations::open(backend, clock());
    assert_eq!(reopened.snapshot().unwrap(), before);

    let next = reopened
        .add_schedule_item(slot("LR-X", "VALOR01", 22))
        .unwrap();
    assert_eq!(next.id, "SCH-002");
}

#[test]
fn corrupt_collection_falls_back_to_fixtures() {
    let backend = InMemoryKeyValueStore::new();
    backend.write(Request::KEY, "[{\"id\": ".into()).unwrap();

    let ops = LabOperations::open(backend, clock());

    assert_eq!(ops.requests().unwrap(), labdesk::lab::fixtures::requests());
}

#[test]
fn file_backend_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let backend = FileKeyValueStore::open(dir.path()).unwrap();
        let ops = LabOperations::seeded(
            backend,
            clock(),
            LabCollections {
                requests: vec![request_lr_x()],
                technicians: vec![valor01()],
                schedule: vec![],
            },
        );
        ops.assign_request("LR-X", "VALOR01").unwrap();
    }

    let backend = FileKeyValueStore::open(dir.path()).unwrap();
    let ops = LabOperations::open(backend, clock());
    let request = ops.request("LR-X").unwrap().unwrap();
    assert_eq!(request.assigned_to.as_deref(), Some("VALOR01"));
    assert!(!ops.technician("VALOR01").unwrap().unwrap().is_available());
    assert!(ops.schedule().unwrap().is_empty());
}
