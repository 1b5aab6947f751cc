use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use labdesk::lab::{Request, Technician};
use labdesk::storage::Collection;

use crate::support::{slot, small_lab};

/// Wait for listener threads to deliver at least `count` events.
fn wait_for(seen: &Arc<Mutex<Vec<String>>>, count: usize) -> Vec<String> {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        let events = seen.lock().unwrap().clone();
        if events.len() >= count || Instant::now() > deadline {
            return events;
        }
        thread::sleep(Duration::from_millis(10));
    }
}

fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |operation: String| sink.lock().unwrap().push(operation))
}

#[test]
fn listeners_hear_about_their_collection() {
    let (ops, _) = small_lab();
    let (requests_seen, on_requests) = recorder();
    let (technicians_seen, on_technicians) = recorder();
    ops.subscribe(Request::KEY, on_requests).unwrap();
    ops.subscribe(Technician::KEY, on_technicians).unwrap();

    ops.update_request_progress("LR-X", 5).unwrap();
    ops.assign_request("LR-X", "VALOR01").unwrap();

    let mut requests = wait_for(&requests_seen, 2);
    requests.sort();
    assert_eq!(requests, vec!["assign_request", "update_request_progress"]);
    assert_eq!(wait_for(&technicians_seen, 1), vec!["assign_request"]);
}

#[test]
fn no_op_mutations_stay_quiet() {
    let (ops, _) = small_lab();
    let (seen, listener) = recorder();
    ops.subscribe("lab_schedule", listener).unwrap();

    ops.delete_schedule_item("SCH-404").unwrap();
    ops.add_schedule_item(slot("LR-X", "VALOR01", 21)).unwrap();

    assert_eq!(wait_for(&seen, 1), vec!["add_schedule_item"]);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(seen.lock().unwrap().len(), 1);
}
