//! Dispatch request payload.

use serde::{Deserialize, Serialize};

use facet_core::types::PersonId;

use crate::assignment::AssignmentRef;

/// Subject used when a caller submits a dispatch without one.
pub const DEFAULT_SUBJECT: &str = "Notification - Appointment renewal";

/// One notification to deliver: the message is opaque to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    /// Recipient.
    pub person_id: PersonId,
    /// Email subject line.
    pub subject: String,
    /// Message body, stored verbatim and sent as the email body.
    pub message: String,
    /// Assignment whose `notified` flag is set on success.
    pub origin: Option<AssignmentRef>,
}

impl DispatchRequest {
    /// Create a request; a blank subject falls back to [`DEFAULT_SUBJECT`].
    pub fn new(
        person_id: PersonId,
        message: impl Into<String>,
        subject: Option<String>,
    ) -> Self {
        let subject = subject
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

        Self {
            person_id,
            subject,
            message: message.into(),
            origin: None,
        }
    }

    /// Attach the originating assignment.
    pub fn with_origin(mut self, origin: AssignmentRef) -> Self {
        self.origin = Some(origin);
        self
    }
}
