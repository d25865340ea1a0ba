//! Route definitions for the FACET HTTP API.
//!
//! All routes are mounted under `/api`.

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(job_routes())
        .merge(dispatch_routes())
        .merge(notification_routes());

    let cors = build_cors_layer(&state.config.server);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// On-demand job triggers and the upcoming-expirations preview
fn job_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/jobs/verify-expirations",
            post(handlers::jobs::verify_expirations),
        )
        .route(
            "/jobs/cleanup-notifications",
            post(handlers::jobs::cleanup_notifications),
        )
        .route(
            "/expirations/upcoming",
            get(handlers::expiration::upcoming),
        )
}

/// Dispatch submission and task polling
fn dispatch_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications/dispatch",
            post(handlers::dispatch::submit),
        )
        .route(
            "/tasks/{id}",
            get(handlers::dispatch::get_task).delete(handlers::dispatch::cancel_task),
        )
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/{id}/read",
            patch(handlers::notification::mark_read),
        )
}
