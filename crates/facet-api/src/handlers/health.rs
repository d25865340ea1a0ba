//! Health check handler.

use axum::Json;
use axum::extract::State;

use facet_entity::dispatch::DispatchStatus;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let store = match &state.pool {
        None => "memory",
        Some(pool) => match pool.health_check().await {
            Ok(true) => "connected",
            Ok(false) => "unavailable",
            Err(e) => {
                tracing::warn!("Database health check failed: {}", e);
                "unavailable"
            }
        },
    };

    let registry = state.dispatcher.registry();
    Json(ApiResponse::ok(HealthResponse {
        status: if store == "unavailable" { "degraded" } else { "ok" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store.to_string(),
        tasks_pending: registry.count_with_status(DispatchStatus::Pending),
        tasks_in_progress: registry.count_with_status(DispatchStatus::InProgress),
    }))
}
