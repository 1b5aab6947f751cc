//! Wizard routes served by axum, exercised with reqwest.

use std::sync::Arc;

use labdesk::wizard::{self, LocalWizardStore};
use labdesk::InMemoryKeyValueStore;
use serde_json::{json, Value};

use crate::support::local_store;

async fn start_server(store: LocalWizardStore<InMemoryKeyValueStore>) -> String {
    let app = wizard::http::router(Arc::new(store));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn save_then_get_step() {
    let base = start_server(local_store(InMemoryKeyValueStore::new())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/calibration/step/equipment"))
        .json(&json!({
            "sessionId": "s1",
            "stepId": "equipment",
            "stepData": { "model": "DM-7", "serial": "A113" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": true, "sessionId": "s1", "stepId": "equipment" }));

    let resp = client
        .get(format!("{base}/calibration/step/equipment"))
        .query(&[("sessionId", "s1")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["stepData"]["serial"], "A113");
    assert_eq!(body["sessionId"], "s1");
}

#[tokio::test]
async fn missing_step_is_404() {
    let base = start_server(local_store(InMemoryKeyValueStore::new())).await;

    let resp = reqwest::Client::new()
        .get(format!("{base}/testing/step/product"))
        .query(&[("sessionId", "nobody")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn mismatched_step_id_is_400() {
    let base = start_server(local_store(InMemoryKeyValueStore::new())).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/testing/step/product"))
        .json(&json!({ "sessionId": "s1", "stepId": "standards", "stepData": {} }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("standards"));
}

#[tokio::test]
async fn submit_then_save_is_409() {
    let base = start_server(local_store(InMemoryKeyValueStore::new())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/certification/submit"))
        .json(&json!({ "sessionId": "s1", "formData": { "marks": ["CE"] } }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["submissionId"].is_string());

    let resp = client
        .post(format!("{base}/certification/step/documents"))
        .json(&json!({ "sessionId": "s1", "stepId": "documents", "stepData": {} }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn unknown_form_is_404() {
    let base = start_server(local_store(InMemoryKeyValueStore::new())).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/payroll/submit"))
        .json(&json!({ "sessionId": "s1", "formData": {} }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
