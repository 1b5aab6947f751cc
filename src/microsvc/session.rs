//! Caller identity forwarded with a command.

use std::collections::HashMap;

const USER_ID: &str = "x-user-id";
const SESSION_ID: &str = "x-session-id";

/// Variables forwarded with a command, keyed by lowercase header name.
///
/// Over HTTP every request header with a UTF-8 value lands here, e.g.
///
/// ```json
/// { "x-user-id": "coordinator-7", "x-session-id": "3f1c..." }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// The coordinator or customer issuing the command.
    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID)
    }

    /// The client session the command was issued from.
    pub fn session_id(&self) -> Option<&str> {
        self.get(SESSION_ID)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}
