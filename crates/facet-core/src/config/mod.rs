//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section; every section has defaults so a partial file is valid.

pub mod app;
pub mod logging;
pub mod mail;
pub mod schedule;
pub mod worker;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::logging::LoggingConfig;
use self::mail::MailConfig;
use self::schedule::{ExpirationConfig, RetentionConfig};
use self::worker::{DispatchConfig, WorkerConfig};

use crate::error::AppError;

/// Upper bound for `retention.notification_retention_days`.
pub const MAX_RETENTION_DAYS: u32 = 36_500;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// (default file + environment overlay + `FACET__*` variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Dispatch worker pool settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Dispatch retry policy settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Outbound mail settings.
    #[serde(default)]
    pub mail: MailConfig,
    /// Expiration scanner settings.
    #[serde(default)]
    pub expiration: ExpirationConfig,
    /// Notification retention settings.
    #[serde(default)]
    pub retention: RetentionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Store backend: `"postgres"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// PostgreSQL connection URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            url: default_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the base file at `path` with an optional `config/{env}` overlay
    /// and environment variables prefixed with `FACET__`.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FACET")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the worker cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.worker.concurrency == 0 {
            return Err(AppError::configuration(
                "worker.concurrency must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.dispatch.jitter) {
            return Err(AppError::configuration(
                "dispatch.jitter must be between 0.0 and 1.0",
            ));
        }
        if self.dispatch.backoff_coefficient < 1.0 {
            return Err(AppError::configuration(
                "dispatch.backoff_coefficient must be >= 1.0",
            ));
        }
        if self.retention.notification_retention_days > MAX_RETENTION_DAYS {
            return Err(AppError::configuration(format!(
                "retention.notification_retention_days must be at most {MAX_RETENTION_DAYS}"
            )));
        }
        if self.mail.from_address.trim().is_empty() {
            return Err(AppError::configuration("mail.from_address is required"));
        }
        Ok(())
    }
}

fn default_provider() -> String {
    "postgres".to_string()
}

fn default_url() -> String {
    "postgres://localhost:5432/facet".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}
