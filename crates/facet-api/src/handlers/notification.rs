//! Recipient-facing notification handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use facet_core::error::AppError;
use facet_core::types::NotificationId;
use facet_entity::notification::Notification;

use crate::dto::request::NotificationListQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/notifications?person_id=
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<ApiResponse<Vec<Notification>>>, ApiError> {
    let list = state
        .notifications
        .list_for_person(query.person_id, query.limit())
        .await?;
    Ok(Json(ApiResponse::ok(list)))
}

/// PATCH /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<NotificationId>,
) -> Result<Json<ApiResponse<Notification>>, ApiError> {
    if !state.notifications.mark_read(id).await? {
        return Err(AppError::not_found(format!("Notification {id} not found")).into());
    }
    let notification = state
        .notifications
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;
    Ok(Json(ApiResponse::ok(notification)))
}
