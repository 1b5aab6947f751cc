//! HttpWizardClient - wizard step API against a remote backend.
//!
//! Requires the `remote` feature. Speaks the same wire format the `http`
//! transport serves:
//!
//! - `GET {base}/{form}/step/{stepId}?sessionId=`
//! - `POST {base}/{form}/step/{stepId}` with `{sessionId, stepId, stepData}`
//! - `POST {base}/{form}/submit` with `{sessionId, formData}`

use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use super::{
    require_id, FormKind, SaveStepRequest, StepReceipt, StepSnapshot, SubmissionReceipt,
    SubmitRequest, WizardApi, WizardError,
};

/// Blocking HTTP client for the wizard step API.
#[derive(Debug, Clone)]
pub struct HttpWizardClient {
    base_url: Url,
    client: Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpWizardClient {
    /// Client for the backend rooted at `base_url` (e.g. `"https://api.example.com/wizard"`).
    pub fn new(base_url: &str) -> Result<Self, WizardError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| WizardError::Remote(format!("invalid base url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(WizardError::Remote(format!("{base_url} cannot be a base url")));
        }
        Ok(Self {
            base_url,
            client: Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments (percent-encoded) to the base url.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, WizardError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| WizardError::Remote(format!("{} cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn transport(err: reqwest::Error) -> WizardError {
    WizardError::Remote(err.to_string())
}

/// Turn a non-success response into the matching error.
fn check(response: Response, session_id: &str) -> Result<Response, WizardError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ErrorBody>()
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());
    Err(match status {
        StatusCode::BAD_REQUEST => WizardError::InvalidPayload(message),
        StatusCode::CONFLICT => WizardError::AlreadySubmitted(session_id.to_string()),
        _ => WizardError::Remote(format!("{status}: {message}")),
    })
}

impl WizardApi for HttpWizardClient {
    fn get_step(
        &self,
        form: FormKind,
        session_id: &str,
        step_id: &str,
    ) -> Result<Option<StepSnapshot>, WizardError> {
        require_id("sessionId", session_id)?;
        require_id("stepId", step_id)?;

        let url = self.endpoint(&[form.slug(), "step", step_id])?;
        let response = self
            .client
            .get(url)
            .query(&[("sessionId", session_id)])
            .send()
            .map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check(response, session_id)?.json().map(Some).map_err(transport)
    }

    fn save_step(
        &self,
        form: FormKind,
        request: &SaveStepRequest,
    ) -> Result<StepReceipt, WizardError> {
        require_id("stepId", &request.step_id)?;
        let url = self.endpoint(&[form.slug(), "step", &request.step_id])?;
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .map_err(transport)?;
        check(response, &request.session_id)?
            .json()
            .map_err(transport)
    }

    fn submit(
        &self,
        form: FormKind,
        request: &SubmitRequest,
    ) -> Result<SubmissionReceipt, WizardError> {
        let url = self.endpoint(&[form.slug(), "submit"])?;
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .map_err(transport)?;
        check(response, &request.session_id)?
            .json()
            .map_err(transport)
    }
}
