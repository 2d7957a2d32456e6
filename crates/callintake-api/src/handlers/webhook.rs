//! Voice-agent webhook intake.
//!
//! Accepts any body, hands it to the dispatcher, and answers with the
//! acknowledgement the platform expects for each request kind.

use axum::{extract::State, http::HeaderMap, Json};
use bytes::Bytes;
use callintake_core::DispatchOutcome;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{ApiError, AppState};

/// Message returned after a successful `save_data` call.
pub const SAVED_MESSAGE: &str = "Patient data saved successfully";

/// Acknowledgement body for `/webhook`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WebhookResponse {
    /// Lifecycle events and unrecognized payloads
    Status {
        /// `call_started`, `call_ended` or `received`
        status: &'static str,
    },
    /// Saved patient data
    Saved {
        /// Always `true`
        success: bool,
        /// Confirmation text
        message: &'static str,
    },
}

impl From<&DispatchOutcome> for WebhookResponse {
    fn from(outcome: &DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::CallStarted => Self::Status { status: "call_started" },
            DispatchOutcome::CallEnded => Self::Status { status: "call_ended" },
            DispatchOutcome::PatientSaved(_) => Self::Saved { success: true, message: SAVED_MESSAGE },
            DispatchOutcome::Received => Self::Status { status: "received" },
        }
    }
}

/// Receives a webhook from the voice-agent platform.
///
/// # Errors
///
/// Returns `ApiError::Webhook` (HTTP 500) if the body is not JSON, the
/// `save_data` arguments are malformed, or the store fails.
#[instrument(
    name = "receive_webhook",
    skip(app_state, headers, body),
    fields(
        content_length = body.len(),
        content_type = headers.get("content-type").and_then(|v| v.to_str().ok()).unwrap_or("unknown"),
    )
)]
pub async fn receive_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    let outcome = app_state.dispatcher.dispatch(&body).await.map_err(ApiError::Webhook)?;

    if let DispatchOutcome::PatientSaved(record) = &outcome {
        info!(patient_id = %record.id, "Webhook stored patient data");
    }

    Ok(Json(WebhookResponse::from(&outcome)))
}
