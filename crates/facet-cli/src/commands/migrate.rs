//! Database migration command.

use facet_core::config::AppConfig;
use facet_core::error::AppError;
use facet_database::DatabasePool;

use crate::output;

/// Apply all pending migrations.
pub async fn execute(config: AppConfig) -> Result<(), AppError> {
    if config.database.provider != "postgres" {
        return Err(AppError::validation(format!(
            "Migrations need the postgres provider (configured: {})",
            config.database.provider
        )));
    }

    let pool = DatabasePool::connect(&config.database).await?;
    println!("Running database migrations...");
    let result = facet_database::migration::run_migrations(pool.pool()).await;
    pool.close().await;
    result?;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
