//! HTTP transport for the wizard step API.
//!
//! Requires the `http` feature. Every form gets the same three routes,
//! nested under its slug:
//!
//! - `GET /{form}/step/:step_id?sessionId=` - saved step data, 404 if none.
//! - `POST /{form}/step/:step_id` - save step data.
//! - `POST /{form}/submit` - submit the whole form.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{FormKind, SaveStepRequest, SubmitRequest, WizardApi, WizardError};

struct FormState<A: ?Sized> {
    api: Arc<A>,
    form: FormKind,
}

impl<A: ?Sized> Clone for FormState<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            form: self.form,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepQuery {
    session_id: String,
}

impl IntoResponse for WizardError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Routes for every form, served by `api`.
pub fn router<A>(api: Arc<A>) -> Router
where
    A: WizardApi + ?Sized + 'static,
{
    FormKind::ALL.into_iter().fold(Router::new(), |router, form| {
        router.nest(&format!("/{}", form.slug()), form_router(Arc::clone(&api), form))
    })
}

fn form_router<A>(api: Arc<A>, form: FormKind) -> Router
where
    A: WizardApi + ?Sized + 'static,
{
    Router::new()
        .route("/step/:step_id", get(get_step::<A>).post(save_step::<A>))
        .route("/submit", post(submit::<A>))
        .with_state(FormState { api, form })
}

async fn get_step<A: WizardApi + ?Sized>(
    State(state): State<FormState<A>>,
    Path(step_id): Path<String>,
    Query(query): Query<StepQuery>,
) -> Response {
    match state.api.get_step(state.form, &query.session_id, &step_id) {
        Ok(Some(step)) => Json(step).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("step {step_id} not saved") })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

async fn save_step<A: WizardApi + ?Sized>(
    State(state): State<FormState<A>>,
    Path(step_id): Path<String>,
    Json(request): Json<SaveStepRequest>,
) -> Response {
    if request.step_id != step_id {
        return WizardError::InvalidPayload(format!(
            "stepId {} does not match path {step_id}",
            request.step_id
        ))
        .into_response();
    }
    match state.api.save_step(state.form, &request) {
        Ok(receipt) => Json(receipt).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn submit<A: WizardApi + ?Sized>(
    State(state): State<FormState<A>>,
    Json(request): Json<SubmitRequest>,
) -> Response {
    match state.api.submit(state.form, &request) {
        Ok(receipt) => Json(receipt).into_response(),
        Err(err) => err.into_response(),
    }
}
