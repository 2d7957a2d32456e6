//! Health check handler for service monitoring.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use callintake_core::time::iso_timestamp;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::AppState;

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service health status
    pub status: HealthStatus,
    /// ISO-8601 time the check was performed
    pub timestamp: String,
    /// Configured service name
    pub service: String,
}

/// Overall health status enumeration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The process is serving requests
    Healthy,
}

/// Health check endpoint handler.
///
/// Touches no files, so it always answers 200 while the process is up.
#[instrument(name = "health_check", skip(app_state))]
pub async fn health_check(State(app_state): State<AppState>) -> impl IntoResponse {
    debug!("Performing health check");

    let response = HealthResponse {
        status: HealthStatus::Healthy,
        timestamp: iso_timestamp(app_state.clock.now_system()),
        service: app_state.service_name.clone(),
    };

    (StatusCode::OK, Json(response))
}
