//! FACET notification server.
//!
//! Wires the stores, mail transport, dispatcher, scheduled jobs and HTTP API
//! together and runs until Ctrl+C or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use facet_core::config::AppConfig;
use facet_core::error::AppError;
use facet_worker::jobs::{ExpirationScanner, NotificationCleanupJob};
use facet_worker::{CronScheduler, Dispatcher, DispatcherConfig};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("FACET_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("FACET_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting FACET notifications v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Stores + migrations ──────────────────────────────
    tracing::info!(
        "Connecting stores (provider: {})...",
        config.database.provider
    );
    let backend = facet_database::connect_stores(&config.database).await?;

    if let Some(pool) = &backend.pool {
        tracing::info!("Running database migrations...");
        facet_database::migration::run_migrations(pool.pool()).await?;
        tracing::info!("Database migrations complete");
    }

    // ── Step 2: Mail transport ───────────────────────────────────
    let transport = facet_mail::build_transport(&config.mail)?;
    tracing::info!("Mail transport '{}' ready", transport.name());

    // ── Step 3: Dispatcher + worker pool ─────────────────────────
    let (dispatcher, worker_handle) = Dispatcher::start(
        DispatcherConfig::from_app(&config),
        backend.stores.clone(),
        transport,
    );
    tracing::info!(
        "Dispatch worker pool started (concurrency: {})",
        config.worker.concurrency
    );

    // ── Step 4: Jobs ─────────────────────────────────────────────
    let scanner = Arc::new(ExpirationScanner::new(
        Arc::clone(&backend.stores.assignments),
        Arc::clone(&dispatcher),
        &config.expiration,
    ));
    let cleanup = Arc::new(
        NotificationCleanupJob::new(Arc::clone(&backend.stores.notifications), &config.retention)
            .with_task_results(
                dispatcher.registry(),
                Duration::from_secs(config.dispatch.task_result_ttl_seconds),
            ),
    );

    // ── Step 5: Cron scheduler ───────────────────────────────────
    let scheduler = if config.worker.enabled {
        let scheduler = CronScheduler::new(Arc::clone(&scanner), Arc::clone(&cleanup)).await?;
        scheduler
            .register_default_tasks(&config.expiration, &config.retention)
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Cron scheduler disabled");
        None
    };

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app_state = facet_api::AppState::new(
        Arc::new(config.clone()),
        &backend,
        Arc::clone(&dispatcher),
        scanner,
        cleanup,
    );
    let app = facet_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("FACET server listening on {}", addr);

    // ── Step 7: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    if let Some(mut scheduler) = scheduler {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!("Scheduler shutdown failed: {}", e);
        }
    }

    tracing::info!("Waiting for running dispatch attempts to complete...");
    dispatcher.shutdown();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    if tokio::time::timeout(grace, worker_handle).await.is_err() {
        tracing::warn!("Dispatch workers did not stop within {:?}", grace);
    }

    if let Some(pool) = &backend.pool {
        pool.close().await;
    }

    tracing::info!("FACET server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
