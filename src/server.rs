//! The HTTP surface: command service and wizard routes on one listener.

use std::sync::Arc;

use axum::Router;
use tracing::info;

use crate::lab::LabOperations;
use crate::microsvc::{self, Service};
use crate::storage::KeyValueStore;
use crate::wizard::{self, WizardApi};

/// Commands under `/commands/:command`, `/health`, and the wizard routes
/// under `/{form}/...`.
pub fn app<S, W>(service: Arc<Service<LabOperations<S>>>, wizard_api: Arc<W>) -> Router
where
    S: KeyValueStore + 'static,
    W: WizardApi + ?Sized + 'static,
{
    microsvc::router(service).merge(wizard::http::router(wizard_api))
}

/// Bind `addr` and serve `app` until the process is stopped.
pub async fn serve(app: Router, addr: &str) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "labdesk listening");
    axum::serve(listener, app).await
}
