//! Notification retention cleanup.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing;

use facet_core::config::schedule::RetentionConfig;
use facet_core::error::AppError;
use facet_core::result::AppResult;
use facet_database::store::NotificationStore;

use crate::registry::TaskRegistry;

/// Outcome of one cleanup run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Notifications deleted.
    pub deleted: u64,
    /// Rows created at or before this instant were deleted.
    pub cutoff: DateTime<Utc>,
    /// Finished dispatch task records dropped from the registry.
    pub tasks_purged: usize,
}

/// Deletes notifications older than the retention window and expires old
/// task results.
#[derive(Debug, Clone)]
pub struct NotificationCleanupJob {
    notifications: Arc<dyn NotificationStore>,
    registry: Option<Arc<TaskRegistry>>,
    retention_days: i64,
    task_result_ttl: StdDuration,
}

impl NotificationCleanupJob {
    /// Create a new cleanup job.
    pub fn new(notifications: Arc<dyn NotificationStore>, config: &RetentionConfig) -> Self {
        Self {
            notifications,
            registry: None,
            retention_days: i64::from(config.notification_retention_days),
            task_result_ttl: StdDuration::ZERO,
        }
    }

    /// Also purge terminal registry entries older than `ttl`.
    pub fn with_task_results(mut self, registry: Arc<TaskRegistry>, ttl: StdDuration) -> Self {
        self.registry = Some(registry);
        self.task_result_ttl = ttl;
        self
    }

    /// Clean up relative to the current time.
    pub async fn run(&self) -> AppResult<CleanupReport> {
        self.run_at(Utc::now()).await
    }

    /// Delete every notification created at or before `now - retention_days`.
    pub async fn run_at(&self, now: DateTime<Utc>) -> AppResult<CleanupReport> {
        let cutoff = Duration::try_days(self.retention_days)
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "notification_retention_days of {} is out of range",
                    self.retention_days
                ))
            })?;
        tracing::info!(
            "Running notification cleanup (older than {} days, cutoff {})",
            self.retention_days,
            cutoff
        );

        let deleted = self.notifications.delete_created_at_or_before(cutoff).await?;

        let tasks_purged = match &self.registry {
            Some(registry) => {
                let before = Duration::from_std(self.task_result_ttl)
                    .ok()
                    .and_then(|ttl| now.checked_sub_signed(ttl))
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                registry.purge_finished(before)
            }
            None => 0,
        };

        tracing::info!(
            "Notification cleanup: removed {} notifications, {} task results",
            deleted,
            tasks_purged
        );

        Ok(CleanupReport {
            deleted,
            cutoff,
            tasks_purged,
        })
    }
}
