//! Several callers working the same wizard session at once.

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use labdesk::storage::{KeyValueStore, StorageError};
use labdesk::wizard::{FormKind, LocalWizardStore, SubmissionReceipt, WizardApi};
use labdesk::InMemoryKeyValueStore;
use serde_json::json;

use crate::support::{clock, step, submission};

/// Backend whose reads stall, so a read and the write that follows it are
/// far apart.
#[derive(Clone)]
struct SlowReads {
    inner: InMemoryKeyValueStore,
}

impl KeyValueStore for SlowReads {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        thread::sleep(Duration::from_millis(50));
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.inner.write(key, value)
    }

    fn write_batch(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        self.inner.write_batch(entries)
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        self.inner.remove(key)
    }
}

fn slow_wizard() -> LocalWizardStore<SlowReads> {
    let backend = SlowReads {
        inner: InMemoryKeyValueStore::new(),
    };
    LocalWizardStore::new(backend, clock())
}

/// Run `call` on `count` threads released together.
fn together<T, F>(count: usize, call: F) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(usize) -> T + Send + Sync + 'static,
{
    let barrier = Arc::new(Barrier::new(count));
    let call = Arc::new(call);
    let handles: Vec<_> = (0..count)
        .map(|index| {
            let barrier = Arc::clone(&barrier);
            let call = Arc::clone(&call);
            thread::spawn(move || {
                barrier.wait();
                call(index)
            })
        })
        .collect();
    handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect()
}

#[test]
fn concurrent_submits_get_the_same_receipt() {
    let api = slow_wizard();

    let receipts: Vec<SubmissionReceipt> = together(2, {
        let api = api.clone();
        move |_| {
            api.submit(FormKind::Testing, &submission("s1", json!({ "urgent": true })))
                .unwrap()
        }
    });

    assert_eq!(receipts[0], receipts[1]);
    let stored = api.submission(FormKind::Testing, "s1").unwrap().unwrap();
    assert_eq!(stored.submission_id, receipts[0].submission_id);
}

#[test]
fn concurrent_step_saves_are_all_kept() {
    const STEPS: [&str; 4] = ["product", "standards", "documents", "contact"];
    let api = slow_wizard();

    together(STEPS.len(), {
        let api = api.clone();
        move |index| {
            api.save_step(
                FormKind::Certification,
                &step("s1", STEPS[index], json!({ "index": index })),
            )
            .unwrap()
        }
    });

    for (index, step_id) in STEPS.iter().enumerate() {
        let saved = api
            .get_step(FormKind::Certification, "s1", step_id)
            .unwrap()
            .unwrap_or_else(|| panic!("{step_id} was lost"));
        assert_eq!(saved.step_data, json!({ "index": index }));
    }
}
