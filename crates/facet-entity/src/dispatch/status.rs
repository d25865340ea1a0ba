//! Dispatch task status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a dispatch task.
///
/// `Pending → InProgress → {Succeeded | Failed}`; a transient failure moves
/// `InProgress` back to `Pending` until retries run out. `Cancelled` is
/// reached from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// Queued or waiting out a retry backoff.
    Pending,
    /// Owned by a worker.
    InProgress,
    /// Delivered.
    Succeeded,
    /// Terminal failure.
    Failed,
    /// Abandoned by request or at shutdown.
    Cancelled,
}

impl DispatchStatus {
    /// Check if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
