//! CLI command definitions and dispatch.

pub mod cleanup;
pub mod dispatch;
pub mod expiration;
pub mod migrate;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::task::JoinHandle;

use facet_core::config::AppConfig;
use facet_core::error::AppError;
use facet_core::result::AppResult;
use facet_database::{StoreBackend, connect_stores};
use facet_entity::dispatch::DispatchStatus;
use facet_worker::jobs::{ExpirationScanner, NotificationCleanupJob};
use facet_worker::{Dispatcher, DispatcherConfig};

use crate::output::OutputFormat;

/// FACET expiration notices: on-demand checks, cleanup, and dispatch
#[derive(Debug, Parser)]
#[command(name = "facet", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (loads config/<env>.toml when present)
    #[arg(short, long, env = "FACET_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan for expiring assignments and send renewal reminders
    VerifyExpirations(expiration::VerifyArgs),
    /// List assignments the next scan would remind
    Upcoming,
    /// Delete notifications past the retention window
    CleanupNotifications,
    /// Send a single notification and wait for the outcome
    Dispatch(dispatch::DispatchArgs),
    /// Apply pending database migrations
    Migrate,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config, &self.env)?;
        match &self.command {
            Commands::VerifyExpirations(args) => {
                expiration::verify(args, config, self.format).await
            }
            Commands::Upcoming => expiration::upcoming(config, self.format).await,
            Commands::CleanupNotifications => cleanup::execute(config, self.format).await,
            Commands::Dispatch(args) => dispatch::execute(args, config, self.format).await,
            Commands::Migrate => migrate::execute(config).await,
        }
    }
}

/// Stores plus a running dispatcher, for commands that send mail.
pub struct Runtime {
    /// Loaded configuration
    pub config: AppConfig,
    /// Store backend
    pub backend: StoreBackend,
    /// Dispatcher with its worker pool running
    pub dispatcher: Arc<Dispatcher>,
    worker: JoinHandle<()>,
}

impl Runtime {
    /// Connect the stores and start the dispatcher.
    pub async fn start(config: AppConfig) -> AppResult<Self> {
        let backend = connect_stores(&config.database).await?;
        let transport = facet_mail::build_transport(&config.mail)?;
        let (dispatcher, worker) = Dispatcher::start(
            DispatcherConfig::from_app(&config),
            backend.stores.clone(),
            transport,
        );
        Ok(Self {
            config,
            backend,
            dispatcher,
            worker,
        })
    }

    /// Scanner wired to this runtime's dispatcher.
    pub fn scanner(&self) -> ExpirationScanner {
        ExpirationScanner::new(
            Arc::clone(&self.backend.stores.assignments),
            Arc::clone(&self.dispatcher),
            &self.config.expiration,
        )
    }

    /// Block until no task is pending or in progress, or `timeout` elapses.
    /// Returns how many tasks were still open.
    pub async fn drain(&self, timeout: Duration) -> usize {
        let registry = self.dispatcher.registry();
        let open = || {
            registry.count_with_status(DispatchStatus::Pending)
                + registry.count_with_status(DispatchStatus::InProgress)
        };

        let wait = async {
            while open() > 0 {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        };
        let _ = tokio::time::timeout(timeout, wait).await;
        open()
    }

    /// Stop the dispatcher and close the pool.
    pub async fn stop(self) {
        self.dispatcher.shutdown();
        if let Err(e) = self.worker.await {
            tracing::error!("Dispatch worker panicked: {}", e);
        }
        if let Some(pool) = &self.backend.pool {
            pool.close().await;
        }
    }
}

/// Cleanup job wired to the given stores, without task-result purging.
pub fn cleanup_job(config: &AppConfig, backend: &StoreBackend) -> NotificationCleanupJob {
    NotificationCleanupJob::new(Arc::clone(&backend.stores.notifications), &config.retention)
}
