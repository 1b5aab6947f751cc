//! Context passed to command handlers.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::HandlerError;
use super::session::Session;

/// The context passed to every command handler.
///
/// Generic over `R`, the state the service was built with.
pub struct Context<'a, R> {
    input: Value,
    session: Session,
    repo: &'a R,
}

impl<'a, R> Context<'a, R> {
    pub(crate) fn new(input: Value, session: Session, repo: &'a R) -> Self {
        Self {
            input,
            session,
            repo,
        }
    }

    /// Deserialize the input payload into a typed struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        T::deserialize(&self.input).map_err(|e| HandlerError::DecodeFailed(e.to_string()))
    }

    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Who issued the command, `"anonymous"` when the session does not say.
    pub fn actor(&self) -> &str {
        self.session.user_id().unwrap_or("anonymous")
    }

    pub fn repo(&self) -> &R {
        self.repo
    }

    /// Check if the raw input contains a non-null field.
    pub fn has_field(&self, field: &str) -> bool {
        self.input.get(field).is_some_and(|v| !v.is_null())
    }

    /// Check if the raw input contains all specified fields.
    pub fn has_fields(&self, fields: &[&str]) -> bool {
        fields.iter().all(|f| self.has_field(f))
    }

    /// Check that `field` is a non-blank string.
    pub fn has_text(&self, field: &str) -> bool {
        self.input
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty())
    }
}
