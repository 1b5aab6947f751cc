//! Application configuration.
//!
//! Layered: hardcoded defaults, then an optional TOML file, then
//! `LABDESK_*` environment variables (which always win).
//!
//! ```toml
//! [storage]
//! backend = "file"
//! data_dir = "/var/lib/labdesk"
//!
//! [server]
//! bind_addr = "127.0.0.1:3000"
//!
//! [wizard]
//! api_base_url = "https://api.example.com/wizard"
//!
//! [logging]
//! filter = "info,labdesk=debug"
//! json = true
//! ```

mod error;
mod logging;
mod storage;

use std::net::SocketAddr;
use std::path::Path;

use mockable::{DefaultEnv, Env};
use serde::{Deserialize, Serialize};

pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use storage::{StorageBackend, StorageConfig};

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LabConfig {
    /// Load from `path` (when given) and apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, &DefaultEnv::new())
    }

    /// As [`LabConfig::load`], with environment lookups going through `env`.
    pub fn load_with_env<E: Env>(path: Option<&Path>, env: &E) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(env)?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env_overrides<E: Env>(&mut self, env: &E) -> Result<(), ConfigError> {
        self.storage.apply_env_overrides(env)?;
        self.server.apply_env_overrides(env)?;
        self.wizard.apply_env_overrides(env)?;
        self.logging.apply_env_overrides(env)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl ServerConfig {
    fn apply_env_overrides<E: Env>(&mut self, env: &E) -> Result<(), ConfigError> {
        if let Some(val) = env.string("LABDESK_BIND_ADDR") {
            self.bind_addr = val;
        }
        self.bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("server.bind_addr", &self.bind_addr, e.to_string()))?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Where wizard sessions go. Without a base URL they stay in local storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub api_base_url: Option<String>,
}

impl WizardConfig {
    fn apply_env_overrides<E: Env>(&mut self, env: &E) -> Result<(), ConfigError> {
        if let Some(val) = env.string("LABDESK_API_URL") {
            let val = val.trim();
            self.api_base_url = (!val.is_empty()).then(|| val.to_string());
        }
        Ok(())
    }
}
