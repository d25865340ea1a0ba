//! On-demand triggers for the periodic jobs.

use axum::Json;
use axum::extract::State;

use facet_worker::jobs::{CleanupReport, ScanReport};

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/jobs/verify-expirations
pub async fn verify_expirations(State(state): State<AppState>) -> Json<ApiResponse<ScanReport>> {
    tracing::info!("verify_expirations triggered via API");
    Json(ApiResponse::ok(state.scanner.run().await))
}

/// POST /api/jobs/cleanup-notifications
pub async fn cleanup_notifications(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CleanupReport>>, ApiError> {
    tracing::info!("cleanup_old_notifications triggered via API");
    let report = state.cleanup.run().await?;
    Ok(Json(ApiResponse::ok(report)))
}
