//! Tests for the `/patients` and `/notifications` debugging endpoints.

use axum::http::{Method, StatusCode};
use callintake_testing::{fixtures, SaveDataBuilder, TestEnv};
use serde_json::json;

#[tokio::test]
async fn patients_is_empty_document_before_first_save() {
    let env = TestEnv::new().expect("failed to create test environment");

    let response = env.get("/patients").await.expect("request failed");

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"patients": []}));
}

#[tokio::test]
async fn patients_returns_full_document() {
    let env = TestEnv::new().expect("failed to create test environment");
    env.post_webhook(
        &SaveDataBuilder::new().name("Jane Doe").field("insurance", json!({"plan": "gold"})).build(),
    )
    .await
    .expect("request failed");

    let response = env.get("/patients").await.expect("request failed");

    let patients = response.body["patients"].as_array().expect("patients should be an array");
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0]["name"], "Jane Doe");
    assert_eq!(patients[0]["insurance"], json!({"plan": "gold"}));
    assert_eq!(patients[0]["id"], 1);
    assert!(patients[0]["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn patients_unchanged_by_lifecycle_events() {
    let env = TestEnv::new().expect("failed to create test environment");
    env.post_webhook(&SaveDataBuilder::with_defaults().build()).await.expect("request failed");
    let before = env.get("/patients").await.expect("request failed").body;

    env.post_webhook(&fixtures::call_started()).await.expect("request failed");
    env.post_webhook(&fixtures::call_ended()).await.expect("request failed");

    let after = env.get("/patients").await.expect("request failed").body;
    assert_eq!(before, after);
}

#[tokio::test]
async fn patients_reports_corrupt_store() {
    let env = TestEnv::new().expect("failed to create test environment");
    std::fs::write(env.data_path(), "[]").expect("failed to corrupt store");

    let response = env.get("/patients").await.expect("request failed");

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn notifications_placeholder_before_first_save() {
    let env = TestEnv::new().expect("failed to create test environment");

    let response = env.get("/notifications").await.expect("request failed");

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"notifications": "No notifications yet"}));
}

#[tokio::test]
async fn notifications_returns_raw_log() {
    let env = TestEnv::new().expect("failed to create test environment");
    env.post_webhook(&SaveDataBuilder::new().name("Jane Doe").build()).await.expect("request failed");
    env.post_webhook(&SaveDataBuilder::new().name("John Roe").build()).await.expect("request failed");

    let response = env.get("/notifications").await.expect("request failed");

    let text = response.body["notifications"].as_str().expect("notifications should be text");
    let on_disk = std::fs::read_to_string(env.notifications_path()).expect("failed to read log");
    assert_eq!(text, on_disk);
    assert_eq!(text.matches("NEW PATIENT CALL").count(), 2);
}

#[tokio::test]
async fn notifications_reports_unreadable_log() {
    let env = TestEnv::new().expect("failed to create test environment");
    std::fs::create_dir(env.notifications_path()).expect("failed to block log path");

    let response = env.get("/notifications").await.expect("request failed");

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn read_endpoints_reject_post() {
    let env = TestEnv::new().expect("failed to create test environment");

    let response = env.send(Method::POST, "/patients", "{}").await.expect("request failed");

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}
