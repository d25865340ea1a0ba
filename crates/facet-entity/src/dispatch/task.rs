//! Dispatch task record as tracked by the status registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use facet_core::types::{NotificationId, TaskId};

use super::request::DispatchRequest;
use super::status::DispatchStatus;

/// Result of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// Notification row created for the recipient.
    pub notification_id: NotificationId,
    /// Address the message was delivered to.
    pub email: String,
    /// Whether this dispatch flipped the origin's `notified` flag.
    pub assignment_flagged: bool,
}

/// Why a dispatch ended without success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchFailure {
    /// Machine-readable error code (e.g. `NO_EMAIL`).
    pub code: String,
    /// Human-readable detail.
    pub message: String,
}

/// A dispatch request together with its processing state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchTask {
    /// Task identifier returned to the submitter.
    pub id: TaskId,
    /// The work item.
    pub request: DispatchRequest,
    /// Current status.
    pub status: DispatchStatus,
    /// Retries scheduled so far (0 on the first attempt).
    pub retry_count: u32,
    /// Attempts started so far.
    pub attempts: u32,
    /// Set when the task succeeded.
    pub outcome: Option<DispatchOutcome>,
    /// Last error; final once the task is terminal.
    pub failure: Option<DispatchFailure>,
    /// Earliest time of the next attempt while waiting out a backoff.
    pub next_attempt_at: Option<DateTime<Utc>>,
    /// When the task was submitted.
    pub created_at: DateTime<Utc>,
    /// When the task last changed state.
    pub updated_at: DateTime<Utc>,
    /// When the task reached a terminal state.
    pub finished_at: Option<DateTime<Utc>>,
}

impl DispatchTask {
    /// Create a new pending task.
    pub fn new(request: DispatchRequest) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            request,
            status: DispatchStatus::Pending,
            retry_count: 0,
            attempts: 0,
            outcome: None,
            failure: None,
            next_attempt_at: None,
            created_at: now,
            updated_at: now,
            finished_at: None,
        }
    }
}
