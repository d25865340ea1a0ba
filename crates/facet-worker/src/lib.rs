//! Notification dispatch and scheduled jobs for FACET.
//!
//! This crate provides:
//! - A dispatcher that queues notification deliveries onto a bounded worker pool
//! - A task status registry that callers poll for outcomes
//! - A retry policy for transient delivery failures
//! - The expiration scanner and notification cleanup jobs
//! - A cron scheduler that runs both jobs periodically

pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod jobs;
pub mod registry;
pub mod retry;
pub mod runner;
pub mod scheduler;
pub mod templates;

pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use error::DispatchError;
pub use registry::{Registration, TaskRegistry};
pub use retry::RetryPolicy;
pub use scheduler::CronScheduler;
