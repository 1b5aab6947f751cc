//! PersistentStore - typed load/save over a key-value backend.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{Collection, KeyValueStore, SnapshotBatch, StorageError};

/// Typed adapter over a [`KeyValueStore`].
///
/// `load` and `save` never fail from the caller's point of view: absent or
/// malformed values fall back to the supplied default, and write failures
/// are logged and dropped. The `try_*` variants surface errors for callers
/// that need to report them.
#[derive(Clone)]
pub struct PersistentStore<S> {
    backend: S,
}

impl<S: KeyValueStore> PersistentStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Get a reference to the underlying backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Load the value under `key`, or `default` if it is absent or unreadable.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(err) => {
                warn!(key, error = %err, "discarding unreadable snapshot");
                default
            }
        }
    }

    /// Load the value under `key`, surfacing read and parse failures.
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.backend.read(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::serde(key, &e)),
            None => Ok(None),
        }
    }

    /// Serialize and write `value` under `key`. Failures are logged, not returned.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(err) = self.try_save(key, value) {
            warn!(key, error = %err, "snapshot write failed");
        }
    }

    /// Serialize and write `value` under `key`.
    pub fn try_save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::serde(key, &e))?;
        self.backend.write(key, raw)?;
        debug!(key, "snapshot written");
        Ok(())
    }

    /// Remove `key`. Returns true if it existed.
    pub fn remove(&self, key: &str) -> Result<bool, StorageError> {
        self.backend.remove(key)
    }

    /// Load a whole collection, or `default` if it was never saved or is corrupt.
    pub fn load_collection<C: Collection>(&self, default: Vec<C>) -> Vec<C> {
        self.load(C::KEY, default)
    }

    /// Start a batch of snapshot writes that land together.
    pub fn batch(&self) -> SnapshotBatch<'_, S> {
        SnapshotBatch::new(self)
    }
}
