//! Single notification dispatch command.

use std::time::Duration;

use clap::Args;

use facet_core::config::AppConfig;
use facet_core::error::AppError;
use facet_core::types::PersonId;
use facet_entity::dispatch::{DispatchRequest, DispatchStatus};

use super::Runtime;
use crate::output::{self, OutputFormat};

/// Arguments for dispatch
#[derive(Debug, Args)]
pub struct DispatchArgs {
    /// Recipient person id
    #[arg(long)]
    pub person_id: PersonId,
    /// Message body
    #[arg(long)]
    pub message: String,
    /// Subject line
    #[arg(long)]
    pub subject: Option<String>,
    /// Seconds to wait for the outcome, retries included
    #[arg(long, default_value_t = 600)]
    pub wait_seconds: u64,
}

/// Submit one notification and report how it ended.
pub async fn execute(args: &DispatchArgs, config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let runtime = Runtime::start(config).await?;

    let request = DispatchRequest::new(args.person_id, args.message.clone(), args.subject.clone());
    let task_id = match runtime.dispatcher.submit(request) {
        Ok(registration) => registration.task_id(),
        Err(e) => {
            runtime.stop().await;
            return Err(e);
        }
    };

    runtime.drain(Duration::from_secs(args.wait_seconds)).await;
    let task = runtime.dispatcher.status(task_id);
    runtime.stop().await;

    let task = task.ok_or_else(|| AppError::internal(format!("Task {task_id} disappeared")))?;

    output::emit(format, &task, |task| {
        output::print_field("Task", task.id);
        output::print_field("Status", task.status);
        output::print_field("Attempts", task.attempts);
        output::print_field("Retries", task.retry_count);
        if let Some(outcome) = &task.outcome {
            output::print_field("Delivered to", &outcome.email);
        }
        if let Some(failure) = &task.failure {
            output::print_field("Last error", format!("{} ({})", failure.message, failure.code));
        }
    });

    match task.status {
        DispatchStatus::Succeeded => {
            output::print_success("Notification delivered.");
            Ok(())
        }
        status => Err(AppError::external_service(format!(
            "Dispatch ended with status {status}"
        ))),
    }
}
