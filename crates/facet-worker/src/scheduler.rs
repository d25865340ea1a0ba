//! Cron scheduler for the periodic jobs.
//!
//! Registers `verify_expirations` and `cleanup_old_notifications`. Only
//! one scheduler instance may run per deployment; overlapping scans across
//! instances are not guarded against here.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use facet_core::config::schedule::{ExpirationConfig, RetentionConfig};
use facet_core::error::AppError;

use crate::jobs::{ExpirationScanner, NotificationCleanupJob};

/// Cron-based scheduler for the expiration scan and retention cleanup.
pub struct CronScheduler {
    scheduler: JobScheduler,
    scanner: Arc<ExpirationScanner>,
    cleanup: Arc<NotificationCleanupJob>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler.
    pub async fn new(
        scanner: Arc<ExpirationScanner>,
        cleanup: Arc<NotificationCleanupJob>,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            scanner,
            cleanup,
        })
    }

    /// Register both jobs, honouring their `enabled` flags.
    pub async fn register_default_tasks(
        &self,
        expiration: &ExpirationConfig,
        retention: &RetentionConfig,
    ) -> Result<(), AppError> {
        if expiration.enabled {
            self.register_verify_expirations(&expiration.schedule).await?;
        } else {
            tracing::info!("Skipped: verify_expirations (disabled)");
        }

        if retention.enabled {
            self.register_cleanup_old_notifications(&retention.schedule)
                .await?;
        } else {
            tracing::info!("Skipped: cleanup_old_notifications (disabled)");
        }

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shut the scheduler down.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    async fn register_verify_expirations(&self, schedule: &str) -> Result<(), AppError> {
        let scanner = Arc::clone(&self.scanner);
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let scanner = Arc::clone(&scanner);
            Box::pin(async move {
                tracing::debug!("Running scheduled verify_expirations");
                scanner.run().await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid verify_expirations schedule '{}': {}",
                schedule, e
            ))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add verify_expirations schedule: {}", e))
        })?;

        tracing::info!("Registered: verify_expirations ({})", schedule);
        Ok(())
    }

    async fn register_cleanup_old_notifications(&self, schedule: &str) -> Result<(), AppError> {
        let cleanup = Arc::clone(&self.cleanup);
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let cleanup = Arc::clone(&cleanup);
            Box::pin(async move {
                tracing::debug!("Running scheduled cleanup_old_notifications");
                if let Err(e) = cleanup.run().await {
                    tracing::error!("cleanup_old_notifications failed: {}", e);
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid cleanup_old_notifications schedule '{}': {}",
                schedule, e
            ))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!(
                "Failed to add cleanup_old_notifications schedule: {}",
                e
            ))
        })?;

        tracing::info!("Registered: cleanup_old_notifications ({})", schedule);
        Ok(())
    }
}
