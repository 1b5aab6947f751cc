//! Storage - Key-value persistence for whole-collection JSON snapshots.
//!
//! A [`KeyValueStore`] is the moral equivalent of browser local storage: it
//! maps string keys to JSON text. [`PersistentStore`] layers typed
//! `load`/`save` on top, falling back to defaults on missing or corrupt
//! data and logging (never surfacing) write failures.
//!
//! ## Example
//!
//! ```ignore
//! use labdesk::storage::{InMemoryKeyValueStore, PersistentStore};
//!
//! let store = PersistentStore::new(InMemoryKeyValueStore::new());
//! store.save("lab_requests", &requests);
//! let loaded: Vec<Request> = store.load("lab_requests", Vec::new());
//! ```

mod batch;
mod configured;
mod file;
mod in_memory;
mod persistent;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Trait for types persisted as one element of a whole-array snapshot.
pub trait Collection: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Storage key the whole collection is saved under (e.g. "lab_requests").
    const KEY: &'static str;

    /// Returns the unique identifier of this element.
    fn id(&self) -> &str;
}

/// Raw string-keyed storage backend.
///
/// Values are JSON text. Implementations must be safe to share between
/// threads; last write wins, there is no merge.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`. Returns None if absent.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write (insert or replace) the value under `key`.
    fn write(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Write several keys so that either all of them land or none do.
    fn write_batch(&self, entries: Vec<(String, String)>) -> Result<(), StorageError>;

    /// Remove `key`. Returns true if it existed.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;
}

/// Error type for storage backends and the persistent adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// A lock guarding the backend was poisoned by a panicking writer.
    #[error("storage lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// Filesystem failure for a specific key.
    #[error("storage io error for key {key}: {message}")]
    Io { key: String, message: String },
    /// Value could not be serialized or deserialized.
    #[error("storage serialization error for key {key}: {message}")]
    Serde { key: String, message: String },
}

impl StorageError {
    pub(crate) fn io(key: &str, err: &std::io::Error) -> Self {
        StorageError::Io {
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn serde(key: &str, err: &serde_json::Error) -> Self {
        StorageError::Serde {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

pub use batch::SnapshotBatch;
pub use configured::ConfiguredStore;
pub use file::FileKeyValueStore;
pub use in_memory::InMemoryKeyValueStore;
pub use persistent::PersistentStore;
