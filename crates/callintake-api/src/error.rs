//! API error type with JSON error envelopes.
//!
//! Every failure is rendered as `{"error": "<message>"}` with HTTP 500.
//! Clients get the message only; the error kind goes to the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use callintake_core::IntakeError;
use serde::Serialize;
use tracing::error;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error description
    pub error: String,
}

/// Handler failures with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Processing a webhook failed.
    #[error("Error processing webhook: {0}")]
    Webhook(#[source] IntakeError),

    /// Reading stored data failed.
    #[error("{0}")]
    Storage(#[source] IntakeError),
}

impl ApiError {
    fn source_kind(&self) -> &'static str {
        match self {
            Self::Webhook(e) | Self::Storage(e) => e.kind(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        error!(kind = self.source_kind(), error = %message, "Request failed");

        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: message })).into_response()
    }
}
