//! Background worker and dispatch retry configuration.

use serde::{Deserialize, Serialize};

/// Dispatch worker pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the cron scheduler is started with the server. The dispatch
    /// pool always runs so on-demand requests are served.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of dispatch requests processed concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Seconds to wait for in-flight dispatches on shutdown.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrency: default_concurrency(),
            shutdown_grace_seconds: default_shutdown_grace(),
        }
    }
}

/// Retry and result-retention settings for dispatch requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum number of retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry, in seconds.
    #[serde(default = "default_backoff_seconds")]
    pub backoff_seconds: u64,
    /// Multiplier applied per subsequent retry (`1.0` keeps the delay fixed).
    #[serde(default = "default_backoff_coefficient")]
    pub backoff_coefficient: f64,
    /// Upper bound on any single retry delay, in seconds.
    #[serde(default = "default_max_backoff_seconds")]
    pub max_backoff_seconds: u64,
    /// Jitter factor in `0.0..=1.0` (`0.1` means ±10%).
    #[serde(default)]
    pub jitter: f64,
    /// How long finished task records stay queryable, in seconds.
    #[serde(default = "default_task_result_ttl")]
    pub task_result_ttl_seconds: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_seconds: default_backoff_seconds(),
            backoff_coefficient: default_backoff_coefficient(),
            max_backoff_seconds: default_max_backoff_seconds(),
            jitter: 0.0,
            task_result_ttl_seconds: default_task_result_ttl(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    2
}

fn default_shutdown_grace() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_seconds() -> u64 {
    60
}

fn default_backoff_coefficient() -> f64 {
    1.0
}

fn default_max_backoff_seconds() -> u64 {
    3600
}

fn default_task_result_ttl() -> u64 {
    3600
}
