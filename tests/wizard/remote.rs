//! HttpWizardClient against a live wizard server.
//!
//! The blocking client must not run inside a tokio runtime, so the server
//! gets its own runtime on a background thread.

use std::sync::{mpsc, Arc};
use std::thread;

use labdesk::config::WizardConfig;
use labdesk::wizard::{self, FormKind, HttpWizardClient, WizardApi, WizardError};
use labdesk::InMemoryKeyValueStore;
use serde_json::json;

use crate::support::{local_store, step, submission};

fn start_server() -> String {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let app = wizard::http::router(Arc::new(local_store(InMemoryKeyValueStore::new())));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://{}", rx.recv().unwrap())
}

#[test]
fn client_round_trips_through_server() {
    let client = HttpWizardClient::new(&start_server()).unwrap();

    let receipt = client
        .save_step(FormKind::Testing, &step("s1", "product", json!({ "name": "T-200" })))
        .unwrap();
    assert!(receipt.success);

    let saved = client
        .get_step(FormKind::Testing, "s1", "product")
        .unwrap()
        .unwrap();
    assert_eq!(saved.step_data, json!({ "name": "T-200" }));

    assert!(client
        .get_step(FormKind::Testing, "s1", "standards")
        .unwrap()
        .is_none());
}

#[test]
fn server_errors_map_back_to_wizard_errors() {
    let client = HttpWizardClient::new(&start_server()).unwrap();

    let err = client
        .submit(FormKind::Calibration, &submission("s1", json!("not an object")))
        .unwrap_err();
    assert!(matches!(err, WizardError::InvalidPayload(_)));

    client
        .submit(FormKind::Calibration, &submission("s1", json!({})))
        .unwrap();
    let err = client
        .save_step(FormKind::Calibration, &step("s1", "equipment", json!({})))
        .unwrap_err();
    assert_eq!(err, WizardError::AlreadySubmitted("s1".into()));
}

#[test]
fn connect_prefers_configured_backend() {
    let base = start_server();
    let local_backend = InMemoryKeyValueStore::new();
    let config = WizardConfig {
        api_base_url: Some(base),
    };

    let api = wizard::connect(&config, local_store(local_backend.clone()));
    api.save_step(FormKind::Testing, &step("s1", "product", json!({})))
        .unwrap();

    assert!(local_backend.is_empty());
    assert!(api.get_step(FormKind::Testing, "s1", "product").unwrap().is_some());
}

#[test]
fn unreachable_backend_is_a_remote_error() {
    let client = HttpWizardClient::new("http://127.0.0.1:9").unwrap();
    let err = client.get_step(FormKind::Testing, "s1", "product").unwrap_err();
    assert!(matches!(err, WizardError::Remote(_)));
}
