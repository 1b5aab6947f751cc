//! Storage-related configuration

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use mockable::Env;

/// Which key-value backend the lab store persists through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local; everything is lost on exit.
    #[default]
    Memory,
    /// One JSON document per key under `data_dir`.
    File,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            _ => Err(ConfigError::invalid(
                "storage.backend",
                s,
                "expected \"memory\" or \"file\"",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub(crate) fn apply_env_overrides<E: Env>(&mut self, env: &E) -> Result<(), ConfigError> {
        if let Some(val) = env.string("LABDESK_STORAGE_BACKEND") {
            self.backend = val.parse()?;
        }
        if let Some(val) = env.string("LABDESK_DATA_DIR") {
            self.data_dir = val.into();
        }
        Ok(())
    }

    fn default_data_dir() -> PathBuf {
        "./data".into()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: Self::default_data_dir(),
        }
    }
}
