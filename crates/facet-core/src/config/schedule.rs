//! Periodic job configuration: expiration scan and notification retention.

use serde::{Deserialize, Serialize};

/// Expiration scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpirationConfig {
    /// Whether the daily scan is scheduled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Look-ahead window in days; an end date on the last day is included.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// Cron expression (with seconds) for `verify_expirations`.
    #[serde(default = "default_scan_schedule")]
    pub schedule: String,
}

impl Default for ExpirationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            horizon_days: default_horizon_days(),
            schedule: default_scan_schedule(),
        }
    }
}

/// Notification retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Whether the periodic cleanup is scheduled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Notifications this many days old (or older) are deleted.
    #[serde(default = "default_retention_days")]
    pub notification_retention_days: u32,
    /// Cron expression (with seconds) for `cleanup_old_notifications`.
    #[serde(default = "default_cleanup_schedule")]
    pub schedule: String,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            notification_retention_days: default_retention_days(),
            schedule: default_cleanup_schedule(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_horizon_days() -> u32 {
    30
}

fn default_scan_schedule() -> String {
    "0 0 6 * * *".to_string()
}

fn default_retention_days() -> u32 {
    180
}

fn default_cleanup_schedule() -> String {
    "0 0 2 * * *".to_string()
}
