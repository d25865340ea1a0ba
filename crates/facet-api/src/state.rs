//! Application state shared across all handlers.

use std::sync::Arc;

use facet_core::config::AppConfig;
use facet_database::store::NotificationStore;
use facet_database::{DatabasePool, StoreBackend};
use facet_worker::Dispatcher;
use facet_worker::jobs::{ExpirationScanner, NotificationCleanupJob};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Dispatch submission and status
    pub dispatcher: Arc<Dispatcher>,
    /// Expiration scanner, for on-demand runs and previews
    pub scanner: Arc<ExpirationScanner>,
    /// Retention cleanup, for on-demand runs
    pub cleanup: Arc<NotificationCleanupJob>,
    /// Notification log
    pub notifications: Arc<dyn NotificationStore>,
    /// Pool behind the stores, for health checks
    pub pool: Option<DatabasePool>,
}

impl AppState {
    /// Assemble the state from already-built components.
    pub fn new(
        config: Arc<AppConfig>,
        backend: &StoreBackend,
        dispatcher: Arc<Dispatcher>,
        scanner: Arc<ExpirationScanner>,
        cleanup: Arc<NotificationCleanupJob>,
    ) -> Self {
        Self {
            config,
            dispatcher,
            scanner,
            cleanup,
            notifications: Arc::clone(&backend.stores.notifications),
            pool: backend.pool.clone(),
        }
    }
}
