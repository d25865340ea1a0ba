//! Expiration scan commands.

use std::time::Duration;

use chrono::Utc;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use facet_core::config::AppConfig;
use facet_core::error::AppError;
use facet_entity::assignment::ExpiringAssignment;

use super::Runtime;
use crate::output::{self, OutputFormat};

/// Arguments for verify-expirations
#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Seconds to wait for submitted reminders to finish before exiting
    #[arg(long, default_value_t = 600)]
    pub wait_seconds: u64,
}

/// One row of the upcoming-expirations table
#[derive(Debug, Serialize, Tabled)]
struct UpcomingRow {
    kind: String,
    holder: String,
    email: String,
    context: String,
    end_date: String,
}

impl From<&ExpiringAssignment> for UpcomingRow {
    fn from(a: &ExpiringAssignment) -> Self {
        Self {
            kind: a.reference.kind.to_string(),
            holder: a.holder.full_name(),
            email: a.holder.deliverable_email().unwrap_or("-").to_string(),
            context: a.context.clone(),
            end_date: a.end_date.format("%d/%m/%Y").to_string(),
        }
    }
}

/// Run one scan and wait for its reminders to settle.
pub async fn verify(args: &VerifyArgs, config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let runtime = Runtime::start(config).await?;
    let report = runtime.scanner().run().await;

    let open = runtime.drain(Duration::from_secs(args.wait_seconds)).await;
    runtime.stop().await;

    output::emit(format, &report, |report| {
        println!("Expiration verification:");
        if let (Some(from), Some(until)) = (report.from, report.until) {
            output::print_field("Window", format!("{from} .. {until}"));
        }
        output::print_field("Scheduled", report.scheduled);
        for (kind, count) in &report.by_kind {
            output::print_field(&format!("  {kind}"), count);
        }
        output::print_field("Already in flight", report.skipped_in_flight);
        output::print_field("Failed", report.failed);
    });

    if open > 0 {
        output::print_warning(&format!(
            "{open} reminders were still pending at exit; the next scan will resubmit them"
        ));
    } else {
        output::print_success("Expiration verification complete.");
    }
    Ok(())
}

/// Print what the next scan would pick up.
pub async fn upcoming(config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let runtime = Runtime::start(config).await?;
    let due = runtime.scanner().preview(Utc::now()).await;
    runtime.stop().await;

    let rows: Vec<UpcomingRow> = due?.iter().map(UpcomingRow::from).collect();
    output::print_rows(&rows, format);
    Ok(())
}
