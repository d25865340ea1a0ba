//! Upcoming expiration listing.

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use facet_entity::assignment::ExpiringAssignment;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/expirations/upcoming
///
/// Assignments the next scan would remind, soonest first.
pub async fn upcoming(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ExpiringAssignment>>>, ApiError> {
    let due = state.scanner.preview(Utc::now()).await?;
    Ok(Json(ApiResponse::ok(due)))
}
