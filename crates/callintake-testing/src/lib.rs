//! Test infrastructure and utilities for deterministic testing.
//!
//! Provides an isolated environment backed by a temporary directory, a
//! pinned clock, request helpers that drive the real router in-process,
//! fixture builders, invariant checks and proptest strategies.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use axum::{body::Body, Router};
use callintake_api::{create_router, AppState};
use callintake_core::{
    JsonFileStore, NotificationLog, Notifier, PatientRecord, PatientStore, StoreDocument, TeamNotifier,
};
use http::{HeaderMap, Method, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub mod fixtures;
pub mod invariants;
pub mod recording;
pub mod strategies;

pub use callintake_core::{Clock, TestClock};
pub use fixtures::SaveDataBuilder;
pub use invariants::Invariants;
pub use recording::RecordingNotifier;

/// 2025-10-19T09:30:00Z, the default start of the test clock.
pub const DEFAULT_START_SECS: u64 = 1_760_866_200;

/// Builder for configuring a `TestEnv`.
pub struct TestEnvBuilder {
    start_time: SystemTime,
    service_name: Option<String>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl Default for TestEnvBuilder {
    fn default() -> Self {
        Self {
            start_time: UNIX_EPOCH + Duration::from_secs(DEFAULT_START_SECS),
            service_name: None,
            notifier: None,
        }
    }
}

impl TestEnvBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial time of the test clock.
    #[must_use]
    pub fn start_time(mut self, start_time: SystemTime) -> Self {
        self.start_time = start_time;
        self
    }

    /// Sets the service name reported by `/health`.
    #[must_use]
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Replaces the file-backed team notifier.
    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Builds the environment.
    pub fn build(self) -> Result<TestEnv> {
        let dir = TempDir::new().context("failed to create test directory")?;
        let clock = TestClock::with_start_time(self.start_time);
        let clock_handle: Arc<dyn Clock> = Arc::new(clock.clone());

        let store = Arc::new(JsonFileStore::new(dir.path().join("data.json")));
        let notification_log = NotificationLog::new(dir.path().join("notifications.txt"));
        let notifier = self.notifier.unwrap_or_else(|| {
            Arc::new(
                TeamNotifier::new(notification_log.clone(), Arc::clone(&clock_handle))
                    .with_console(false),
            )
        });

        let store_handle: Arc<dyn PatientStore> = store.clone();
        let mut state = AppState::new(store_handle, notifier, notification_log.clone(), clock_handle);
        if let Some(name) = self.service_name {
            state = state.with_service_name(name);
        }

        Ok(TestEnv { clock, router: create_router(state), store, notification_log, dir })
    }
}

/// Isolated service instance for integration testing.
///
/// The store and notification log live in a temporary directory removed
/// on drop. Requests go through the production router without a socket.
pub struct TestEnv {
    /// Deterministic clock shared with the service
    pub clock: TestClock,
    router: Router,
    store: Arc<JsonFileStore>,
    notification_log: NotificationLog,
    dir: TempDir,
}

/// A fully buffered response.
#[derive(Debug)]
pub struct TestResponse {
    /// Response status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Body parsed as JSON (`Value::Null` if empty or not JSON)
    pub body: Value,
}

impl TestEnv {
    /// Creates an environment with default settings.
    pub fn new() -> Result<Self> {
        TestEnvBuilder::new().build()
    }

    /// Returns a builder for custom environments.
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::new()
    }

    /// Directory holding the service files.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the store document.
    pub fn data_path(&self) -> PathBuf {
        self.store.path().to_path_buf()
    }

    /// Path of the notification log.
    pub fn notifications_path(&self) -> PathBuf {
        self.notification_log.path().to_path_buf()
    }

    /// Advances the test clock.
    pub fn advance_time(&self, duration: Duration) {
        self.clock.advance(duration);
    }

    /// Sends a raw request through the router.
    pub async fn send(&self, method: Method, uri: &str, body: impl Into<Body>) -> Result<TestResponse> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .context("failed to build request")?;

        let response = self.router.clone().oneshot(request).await.context("request failed")?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("failed to read response body")?;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        Ok(TestResponse { status, headers, body })
    }

    /// POSTs a JSON payload to `/webhook`.
    pub async fn post_webhook(&self, payload: &Value) -> Result<TestResponse> {
        self.send(Method::POST, "/webhook", payload.to_string()).await
    }

    /// POSTs raw bytes to `/webhook`.
    pub async fn post_webhook_raw(&self, body: impl Into<Body>) -> Result<TestResponse> {
        self.send(Method::POST, "/webhook", body).await
    }

    /// GETs `uri`.
    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        self.send(Method::GET, uri, Body::empty()).await
    }

    /// Loads the store document directly, bypassing HTTP.
    pub async fn document(&self) -> Result<StoreDocument> {
        Ok(self.store.load().await?)
    }

    /// Loads stored patients directly, bypassing HTTP.
    pub async fn patients(&self) -> Result<Vec<PatientRecord>> {
        Ok(self.document().await?.patients)
    }

    /// Reads the notification log directly, `None` if never written.
    pub async fn notifications(&self) -> Result<Option<String>> {
        Ok(self.notification_log.read().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn environment_starts_empty() {
        let env = TestEnv::new().unwrap();

        assert!(env.patients().await.unwrap().is_empty());
        assert_eq!(env.notifications().await.unwrap(), None);
        assert!(env.data_path().starts_with(env.dir()));
        assert!(env.notifications_path().starts_with(env.dir()));
    }

    #[tokio::test]
    async fn clock_is_pinned_to_start_time() {
        let env = TestEnv::new().unwrap();
        let start = UNIX_EPOCH + Duration::from_secs(DEFAULT_START_SECS);

        assert_eq!(env.clock.now_system(), start);
        env.advance_time(Duration::from_secs(90));
        assert_eq!(env.clock.now_system(), start + Duration::from_secs(90));
    }
}
