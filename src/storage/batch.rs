//! SnapshotBatch - Chain several collection snapshots into one write.
//!
//! ## Example
//!
//! ```ignore
//! store
//!     .batch()
//!     .collection(&requests)
//!     .collection(&technicians)
//!     .commit()?;
//! ```

use serde::Serialize;
use tracing::warn;

use super::{Collection, KeyValueStore, PersistentStore, StorageError};

/// Builder for writing several keys through one `write_batch` call.
///
/// Values are serialized as they are queued; the first serialization
/// failure is remembered and returned by `commit`, and nothing is written.
pub struct SnapshotBatch<'a, S> {
    store: &'a PersistentStore<S>,
    entries: Vec<(String, String)>,
    failed: Option<StorageError>,
}

impl<'a, S: KeyValueStore> SnapshotBatch<'a, S> {
    pub fn new(store: &'a PersistentStore<S>) -> Self {
        Self {
            store,
            entries: vec![],
            failed: None,
        }
    }

    /// Queue `value` under `key`.
    pub fn put<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
        if self.failed.is_some() {
            return self;
        }
        match serde_json::to_string(value) {
            Ok(raw) => self.entries.push((key.to_string(), raw)),
            Err(e) => self.failed = Some(StorageError::serde(key, &e)),
        }
        self
    }

    /// Queue a whole collection snapshot under its key.
    pub fn collection<C: Collection>(self, items: &[C]) -> Self {
        self.put(C::KEY, items)
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every queued entry together.
    pub fn commit(self) -> Result<(), StorageError> {
        if let Some(err) = self.failed {
            return Err(err);
        }
        if self.is_empty() {
            return Ok(());
        }
        self.store.backend().write_batch(self.entries)
    }

    /// Write every queued entry, logging instead of returning a failure.
    pub fn commit_or_log(self) {
        let keys: Vec<String> = self.entries.iter().map(|(key, _)| key.clone()).collect();
        if let Err(err) = self.commit() {
            warn!(?keys, error = %err, "snapshot batch write failed");
        }
    }
}
