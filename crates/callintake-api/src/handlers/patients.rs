//! Read access to the patient store.

use axum::{extract::State, Json};
use callintake_core::StoreDocument;
use tracing::{debug, instrument};

use crate::{ApiError, AppState};

/// Returns the full store document.
///
/// # Errors
///
/// Returns `ApiError::Storage` (HTTP 500) if the document cannot be read
/// or parsed.
#[instrument(name = "list_patients", skip(app_state))]
pub async fn list_patients(State(app_state): State<AppState>) -> Result<Json<StoreDocument>, ApiError> {
    let document = app_state.store.load().await.map_err(ApiError::Storage)?;
    debug!(records = document.len(), "Loaded patient records");

    Ok(Json(document))
}
