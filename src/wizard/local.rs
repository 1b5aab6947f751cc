//! LocalWizardStore - wizard sessions kept in key-value storage.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::lab::SharedClock;
use crate::storage::{KeyValueStore, PersistentStore, StorageError};

use super::{
    require_id, FormKind, SaveStepRequest, StepReceipt, StepSnapshot, SubmissionReceipt,
    SubmitRequest, WizardApi, WizardError,
};

/// In-flight wizard state for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardDraft {
    pub session_id: String,
    pub form: FormKind,
    /// Step id -> data saved for that step.
    pub steps: BTreeMap<String, Value>,
    pub updated_at: DateTime<Utc>,
}

/// A submitted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub submission_id: String,
    pub session_id: String,
    pub form: FormKind,
    pub form_data: Value,
    /// Step data saved before submitting.
    #[serde(default)]
    pub steps: BTreeMap<String, Value>,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    fn receipt(&self) -> SubmissionReceipt {
        SubmissionReceipt {
            success: true,
            session_id: self.session_id.clone(),
            submission_id: self.submission_id.clone(),
        }
    }
}

/// Wizard sessions persisted under session-scoped keys.
///
/// Clone-friendly when the backend is. Clones share one write lock, so a
/// step save or submit reads and writes a session without another writer
/// in between.
#[derive(Clone)]
pub struct LocalWizardStore<S> {
    store: PersistentStore<S>,
    clock: SharedClock,
    writer: Arc<Mutex<()>>,
}

impl<S: KeyValueStore> LocalWizardStore<S> {
    pub fn new(backend: S, clock: SharedClock) -> Self {
        Self {
            store: PersistentStore::new(backend),
            clock,
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// The current draft, if the session has saved any step.
    ///
    /// A corrupt draft reads as absent.
    pub fn draft(&self, form: FormKind, session_id: &str) -> Option<WizardDraft> {
        self.store.load(&form.draft_key(session_id), None)
    }

    /// The submission for a session, if it has been submitted.
    pub fn submission(&self, form: FormKind, session_id: &str) -> Result<Option<Submission>, WizardError> {
        Ok(self.store.try_load(&form.submission_key(session_id))?)
    }

    fn lock_writer(&self, operation: &'static str) -> Result<MutexGuard<'_, ()>, WizardError> {
        self.writer
            .lock()
            .map_err(|_| WizardError::Storage(StorageError::LockPoisoned(operation)))
    }

    fn ensure_open(&self, form: FormKind, session_id: &str) -> Result<(), WizardError> {
        if self.submission(form, session_id)?.is_some() {
            return Err(WizardError::AlreadySubmitted(session_id.to_string()));
        }
        Ok(())
    }
}

impl<S: KeyValueStore> WizardApi for LocalWizardStore<S> {
    fn get_step(
        &self,
        form: FormKind,
        session_id: &str,
        step_id: &str,
    ) -> Result<Option<StepSnapshot>, WizardError> {
        require_id("sessionId", session_id)?;
        require_id("stepId", step_id)?;

        let snapshot = self.draft(form, session_id).and_then(|mut draft| {
            draft.steps.remove(step_id).map(|step_data| StepSnapshot {
                session_id: session_id.to_string(),
                step_id: step_id.to_string(),
                step_data,
            })
        });
        Ok(snapshot)
    }

    fn save_step(
        &self,
        form: FormKind,
        request: &SaveStepRequest,
    ) -> Result<StepReceipt, WizardError> {
        require_id("sessionId", &request.session_id)?;
        require_id("stepId", &request.step_id)?;
        let _writer = self.lock_writer("save_step")?;
        self.ensure_open(form, &request.session_id)?;

        let now = self.clock.utc();
        let mut draft = self
            .draft(form, &request.session_id)
            .unwrap_or_else(|| WizardDraft {
                session_id: request.session_id.clone(),
                form,
                steps: BTreeMap::new(),
                updated_at: now,
            });
        draft
            .steps
            .insert(request.step_id.clone(), request.step_data.clone());
        draft.updated_at = now;

        self.store
            .try_save(&form.draft_key(&request.session_id), &draft)?;
        debug!(%form, session_id = %request.session_id, step_id = %request.step_id, "wizard step saved");

        Ok(StepReceipt {
            success: true,
            session_id: request.session_id.clone(),
            step_id: request.step_id.clone(),
        })
    }

    fn submit(
        &self,
        form: FormKind,
        request: &SubmitRequest,
    ) -> Result<SubmissionReceipt, WizardError> {
        require_id("sessionId", &request.session_id)?;
        if !request.form_data.is_object() {
            return Err(WizardError::InvalidPayload(
                "formData must be a JSON object".into(),
            ));
        }
        let _writer = self.lock_writer("submit")?;
        if let Some(existing) = self.submission(form, &request.session_id)? {
            debug!(%form, session_id = %request.session_id, "wizard already submitted");
            return Ok(existing.receipt());
        }

        let steps = self
            .draft(form, &request.session_id)
            .map(|draft| draft.steps)
            .unwrap_or_default();
        let submission = Submission {
            submission_id: uuid::Uuid::new_v4().to_string(),
            session_id: request.session_id.clone(),
            form,
            form_data: request.form_data.clone(),
            steps,
            submitted_at: self.clock.utc(),
        };

        self.store
            .try_save(&form.submission_key(&request.session_id), &submission)?;
        if let Err(err) = self.store.remove(&form.draft_key(&request.session_id)) {
            warn!(%form, session_id = %request.session_id, error = %err, "stale wizard draft left behind");
        }
        debug!(%form, session_id = %request.session_id, submission_id = %submission.submission_id, "wizard submitted");

        Ok(submission.receipt())
    }
}
