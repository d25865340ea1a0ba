//! Request DTOs.

use serde::Deserialize;

use facet_core::types::PersonId;

/// POST /api/notifications/dispatch
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchNotificationRequest {
    /// Recipient.
    pub person_id: PersonId,
    /// Message body.
    pub message: String,
    /// Subject line; the default subject applies when absent.
    #[serde(default)]
    pub subject: Option<String>,
}

/// Query parameters for GET /api/notifications.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationListQuery {
    /// Recipient to list for.
    pub person_id: PersonId,
    /// Maximum rows (default 50, at most 200).
    #[serde(default)]
    pub limit: Option<i64>,
}

impl NotificationListQuery {
    /// Limit clamped to `1..=200`.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }
}
