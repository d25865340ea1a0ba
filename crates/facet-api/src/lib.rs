//! # facet-api
//!
//! HTTP surface for the notification subsystem built on Axum: on-demand
//! job triggers, dispatch submission, task status polling, and the
//! recipient-facing notification endpoints.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
