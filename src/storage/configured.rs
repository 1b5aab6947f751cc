//! ConfiguredStore - backend chosen at runtime from configuration.

use crate::config::{StorageBackend, StorageConfig};

use super::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, StorageError};

/// Either backend, selected by [`StorageConfig::backend`].
#[derive(Clone)]
pub enum ConfiguredStore {
    Memory(InMemoryKeyValueStore),
    File(FileKeyValueStore),
}

impl ConfiguredStore {
    /// Open the backend described by `config`.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        match config.backend {
            StorageBackend::Memory => Ok(ConfiguredStore::Memory(InMemoryKeyValueStore::new())),
            StorageBackend::File => {
                FileKeyValueStore::open(&config.data_dir).map(ConfiguredStore::File)
            }
        }
    }
}

impl KeyValueStore for ConfiguredStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            ConfiguredStore::Memory(store) => store.read(key),
            ConfiguredStore::File(store) => store.read(key),
        }
    }

    fn write(&self, key: &str, value: String) -> Result<(), StorageError> {
        match self {
            ConfiguredStore::Memory(store) => store.write(key, value),
            ConfiguredStore::File(store) => store.write(key, value),
        }
    }

    fn write_batch(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        match self {
            ConfiguredStore::Memory(store) => store.write_batch(entries),
            ConfiguredStore::File(store) => store.write_batch(entries),
        }
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        match self {
            ConfiguredStore::Memory(store) => store.remove(key),
            ConfiguredStore::File(store) => store.remove(key),
        }
    }
}
