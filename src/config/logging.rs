//! Logging configuration

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use mockable::Env;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `"info,labdesk=debug"`.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl LoggingConfig {
    pub(crate) fn apply_env_overrides<E: Env>(&mut self, env: &E) -> Result<(), ConfigError> {
        if let Some(val) = env.string("LABDESK_LOG") {
            self.filter = val;
        }
        if let Some(val) = env.string("LABDESK_LOG_JSON") {
            self.json = parse_bool("logging.json", &val)?;
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, value, "expected a boolean")),
    }
}
