//! Read access to the notification log.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::instrument;

use crate::{ApiError, AppState};

/// Returned in place of the log before anything was written.
pub const EMPTY_LOG_MESSAGE: &str = "No notifications yet";

/// Notification log response.
#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    /// Raw log text
    pub notifications: String,
}

/// Returns the notification log verbatim.
///
/// # Errors
///
/// Returns `ApiError::Storage` (HTTP 500) if the log exists but cannot be
/// read.
#[instrument(name = "list_notifications", skip(app_state))]
pub async fn list_notifications(
    State(app_state): State<AppState>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let notifications = app_state
        .notification_log
        .read()
        .await
        .map_err(ApiError::Storage)?
        .unwrap_or_else(|| EMPTY_LOG_MESSAGE.to_string());

    Ok(Json(NotificationsResponse { notifications }))
}
