//! Response DTOs.

use serde::{Deserialize, Serialize};

use facet_core::types::TaskId;
use facet_entity::dispatch::DispatchStatus;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// `"connected"`, `"unavailable"`, or `"memory"` for the in-memory backend.
    pub store: String,
    /// Tasks waiting in the queue or a retry backoff.
    pub tasks_pending: usize,
    /// Tasks currently being attempted.
    pub tasks_in_progress: usize,
}

/// Acknowledgement for a dispatch submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchAccepted {
    /// Id to poll at GET /api/tasks/{id}.
    pub task_id: TaskId,
    /// Status at the time of the response.
    pub status: DispatchStatus,
}

/// Result of a cancel request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    /// The task.
    pub task_id: TaskId,
    /// Status after the request.
    pub status: DispatchStatus,
}
