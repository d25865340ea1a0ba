//! Store backend selection from configuration.

use std::sync::Arc;

use tracing::info;

use facet_core::config::DatabaseConfig;
use facet_core::error::AppError;
use facet_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::store::Stores;

/// The stores plus the pool behind them, when there is one.
#[derive(Debug, Clone)]
pub struct StoreBackend {
    /// Store handles for the components.
    pub stores: Stores,
    /// PostgreSQL pool for the `postgres` provider.
    pub pool: Option<DatabasePool>,
}

/// Open the backend named by `database.provider`.
pub async fn connect_stores(config: &DatabaseConfig) -> AppResult<StoreBackend> {
    match config.provider.as_str() {
        "postgres" => {
            let pool = DatabasePool::connect(config).await?;
            Ok(StoreBackend {
                stores: Stores::postgres(&pool),
                pool: Some(pool),
            })
        }
        "memory" => {
            info!("Using in-memory stores; data is lost on exit");
            Ok(StoreBackend {
                stores: Stores::memory(Arc::new(MemoryStore::new())),
                pool: None,
            })
        }
        other => Err(AppError::configuration(format!(
            "Unknown database provider '{other}' (expected 'postgres' or 'memory')"
        ))),
    }
}
