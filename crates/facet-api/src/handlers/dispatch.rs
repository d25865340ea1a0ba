//! Dispatch submission and task status handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use facet_core::error::AppError;
use facet_core::types::TaskId;
use facet_entity::dispatch::{DispatchRequest, DispatchStatus, DispatchTask};

use crate::dto::request::DispatchNotificationRequest;
use crate::dto::response::{ApiResponse, CancelResponse, DispatchAccepted};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/notifications/dispatch
///
/// Returns 202 with the task id as soon as the request is queued.
pub async fn submit(
    State(state): State<AppState>,
    Json(req): Json<DispatchNotificationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DispatchAccepted>>), ApiError> {
    let request = DispatchRequest::new(req.person_id, req.message, req.subject);
    let task_id = state.dispatcher.submit(request)?.task_id();

    let status = state
        .dispatcher
        .status(task_id)
        .map(|t| t.status)
        .unwrap_or(DispatchStatus::Pending);

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::ok(DispatchAccepted { task_id, status })),
    ))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> Result<Json<ApiResponse<DispatchTask>>, ApiError> {
    let task = state
        .dispatcher
        .status(id)
        .ok_or_else(|| AppError::not_found(format!("Task {id} not found")))?;
    Ok(Json(ApiResponse::ok(task)))
}

/// DELETE /api/tasks/{id}
pub async fn cancel_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> Result<Json<ApiResponse<CancelResponse>>, ApiError> {
    let task = state
        .dispatcher
        .status(id)
        .ok_or_else(|| AppError::not_found(format!("Task {id} not found")))?;

    if !state.dispatcher.cancel(id) {
        return Err(AppError::conflict(format!(
            "Task {id} already finished with status {}",
            task.status
        ))
        .into());
    }

    Ok(Json(ApiResponse::ok(CancelResponse {
        task_id: id,
        status: DispatchStatus::Cancelled,
    })))
}
