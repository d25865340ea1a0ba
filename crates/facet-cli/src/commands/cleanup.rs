//! Notification cleanup command.

use facet_core::config::AppConfig;
use facet_core::error::AppError;
use facet_database::connect_stores;

use crate::output::{self, OutputFormat};

/// Delete notifications past the retention window.
pub async fn execute(config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let backend = connect_stores(&config.database).await?;
    let report = super::cleanup_job(&config, &backend).run().await;
    if let Some(pool) = &backend.pool {
        pool.close().await;
    }
    let report = report?;

    output::emit(format, &report, |report| {
        output::print_field("Cutoff", report.cutoff.to_rfc3339());
        output::print_field("Deleted", report.deleted);
        output::print_success("Notification cleanup complete.");
    });
    Ok(())
}
