//! Wizard - step-by-step intake form sessions.
//!
//! Each intake form (testing, calibration, certification request) is filled
//! in over several steps. Step data is saved per session as the user moves
//! through the wizard, and the whole form is submitted at the end.
//!
//! [`WizardApi`] is the client-facing contract. [`LocalWizardStore`] keeps
//! drafts in key-value storage; with the `remote` feature, `HttpWizardClient`
//! talks to a backend instead. [`connect`] picks the remote backend when a
//! base URL is configured and falls back to local storage otherwise.

mod local;
#[cfg(feature = "remote")]
mod remote;

#[cfg(feature = "http")]
pub mod http;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::WizardConfig;
use crate::storage::{KeyValueStore, StorageError};

pub use local::{LocalWizardStore, Submission, WizardDraft};
#[cfg(feature = "remote")]
pub use remote::HttpWizardClient;

/// The intake forms the wizard serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Testing,
    Calibration,
    Certification,
}

impl FormKind {
    pub const ALL: [FormKind; 3] = [
        FormKind::Testing,
        FormKind::Calibration,
        FormKind::Certification,
    ];

    /// URL path segment, e.g. `"calibration"`.
    pub const fn slug(self) -> &'static str {
        match self {
            FormKind::Testing => "testing",
            FormKind::Calibration => "calibration",
            FormKind::Certification => "certification",
        }
    }

    /// Storage key holding the draft for `session_id`.
    pub fn draft_key(self, session_id: &str) -> String {
        format!("{}_form:{}", self.slug(), session_id)
    }

    /// Storage key holding the submission for `session_id`.
    pub fn submission_key(self, session_id: &str) -> String {
        format!("{}:submission", self.draft_key(session_id))
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for FormKind {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| WizardError::InvalidPayload(format!("unknown form: {s}")))
    }
}

/// Generate a fresh wizard session id.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Saved data for one step, as returned by `GET step/{stepId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSnapshot {
    pub session_id: String,
    pub step_id: String,
    pub step_data: Value,
}

/// Body of `POST step/{stepId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveStepRequest {
    pub session_id: String,
    pub step_id: String,
    pub step_data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReceipt {
    pub success: bool,
    pub session_id: String,
    pub step_id: String,
}

/// Body of `POST submit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub session_id: String,
    pub form_data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub success: bool,
    pub session_id: String,
    pub submission_id: String,
}

/// Error type for wizard session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("wizard storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("invalid wizard payload: {0}")]
    InvalidPayload(String),
    #[error("wizard session {0} was already submitted")]
    AlreadySubmitted(String),
    #[error("wizard backend request failed: {0}")]
    Remote(String),
}

impl WizardError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            WizardError::Storage(_) => 500,
            WizardError::InvalidPayload(_) => 400,
            WizardError::AlreadySubmitted(_) => 409,
            WizardError::Remote(_) => 502,
        }
    }
}

/// Client-side contract of the wizard step API.
pub trait WizardApi: Send + Sync {
    /// Saved data for one step, or None if the step was never saved.
    fn get_step(
        &self,
        form: FormKind,
        session_id: &str,
        step_id: &str,
    ) -> Result<Option<StepSnapshot>, WizardError>;

    /// Save (replace) the data for one step.
    fn save_step(&self, form: FormKind, request: &SaveStepRequest)
        -> Result<StepReceipt, WizardError>;

    /// Submit the completed form. Submitting the same session again returns
    /// the original receipt.
    fn submit(
        &self,
        form: FormKind,
        request: &SubmitRequest,
    ) -> Result<SubmissionReceipt, WizardError>;
}

/// Choose the wizard backend: remote when `config.api_base_url` is set,
/// local storage otherwise.
pub fn connect<S>(config: &WizardConfig, local: LocalWizardStore<S>) -> Box<dyn WizardApi>
where
    S: KeyValueStore + 'static,
{
    match config.api_base_url.as_deref() {
        #[cfg(feature = "remote")]
        Some(base_url) => match HttpWizardClient::new(base_url) {
            Ok(client) => Box::new(client),
            Err(err) => {
                tracing::warn!(base_url, error = %err, "unusable wizard backend url, using local storage");
                Box::new(local)
            }
        },
        #[cfg(not(feature = "remote"))]
        Some(base_url) => {
            tracing::warn!(base_url, "remote wizard backend not compiled in, using local storage");
            Box::new(local)
        }
        None => Box::new(local),
    }
}

pub(crate) fn require_id(field: &str, value: &str) -> Result<(), WizardError> {
    if value.trim().is_empty() {
        return Err(WizardError::InvalidPayload(format!("{field} must not be empty")));
    }
    Ok(())
}
