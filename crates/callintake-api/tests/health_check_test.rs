//! Health check endpoint tests.

use std::time::{Duration, UNIX_EPOCH};

use axum::http::StatusCode;
use callintake_core::time::iso_timestamp;
use callintake_testing::{Clock, TestEnv};

#[tokio::test]
async fn health_check_reports_healthy() {
    let env = TestEnv::new().expect("failed to create test environment");

    let response = env.get("/health").await.expect("request failed");

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["service"], "Voice Agent MVP");
    assert_eq!(response.body["timestamp"].as_str(), Some(iso_timestamp(env.clock.now_system()).as_str()));
}

#[tokio::test]
async fn health_check_uses_configured_service_name() {
    let start = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let env = TestEnv::builder()
        .service_name("front-desk-intake")
        .start_time(start)
        .build()
        .expect("failed to create test environment");

    let response = env.get("/health").await.expect("request failed");

    assert_eq!(response.body["service"], "front-desk-intake");
    assert_eq!(response.body["timestamp"].as_str(), Some(iso_timestamp(start).as_str()));
}

#[tokio::test]
async fn health_check_ignores_corrupt_store() {
    let env = TestEnv::new().expect("failed to create test environment");
    std::fs::write(env.data_path(), "garbage").expect("failed to corrupt store");

    let response = env.get("/health").await.expect("request failed");

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let env = TestEnv::new().expect("failed to create test environment");

    let response = env.get("/ready").await.expect("request failed");

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
