//! Dispatcher: the submit/status/cancel surface over the worker pool.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing;

use facet_core::config::AppConfig;
use facet_core::error::AppError;
use facet_core::result::AppResult;
use facet_core::types::TaskId;
use facet_database::store::Stores;
use facet_entity::dispatch::{DispatchRequest, DispatchTask};
use facet_mail::MailTransport;

use crate::executor::DispatchExecutor;
use crate::registry::{Registration, TaskRegistry};
use crate::retry::RetryPolicy;
use crate::runner::WorkerRunner;

/// Settings the dispatcher is constructed with.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Number of concurrent delivery attempts.
    pub concurrency: usize,
    /// Sender address for every message.
    pub from_address: String,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
    /// How long shutdown waits for running attempts.
    pub shutdown_grace: Duration,
    /// How long finished task results are kept; `None` keeps them until
    /// something else purges the registry.
    pub task_result_ttl: Option<Duration>,
}

impl DispatcherConfig {
    /// Derive from the application configuration.
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            concurrency: config.worker.concurrency,
            from_address: config.mail.from_address.clone(),
            retry: RetryPolicy::from_config(&config.dispatch),
            shutdown_grace: Duration::from_secs(config.worker.shutdown_grace_seconds),
            task_result_ttl: Some(Duration::from_secs(config.dispatch.task_result_ttl_seconds)),
        }
    }
}

/// Accepts dispatch requests and reports their status.
#[derive(Debug)]
pub struct Dispatcher {
    registry: Arc<TaskRegistry>,
    queue: mpsc::UnboundedSender<TaskId>,
}

impl Dispatcher {
    /// Spawn the worker pool and return the dispatcher with the pool's handle.
    pub fn start(
        config: DispatcherConfig,
        stores: Stores,
        transport: Arc<dyn MailTransport>,
    ) -> (Arc<Self>, JoinHandle<()>) {
        let registry = Arc::new(TaskRegistry::new());
        let (tx, rx) = mpsc::unbounded_channel();

        let executor = Arc::new(DispatchExecutor::new(
            stores,
            transport,
            config.from_address,
        ));

        let runner = WorkerRunner::new(
            Arc::clone(&registry),
            executor,
            config.retry,
            (tx.clone(), rx),
            config.concurrency,
            config.shutdown_grace,
        )
        .with_result_ttl(config.task_result_ttl);
        let handle = tokio::spawn(runner.run());

        (Arc::new(Self { registry, queue: tx }), handle)
    }

    /// Queue a request and return immediately.
    ///
    /// When the request's origin already has a task in flight, that task's
    /// id is returned as [`Registration::InFlight`] and nothing is queued.
    pub fn submit(&self, request: DispatchRequest) -> AppResult<Registration> {
        if request.message.trim().is_empty() {
            return Err(AppError::validation("Message body must not be empty"));
        }

        let registration = self.registry.register(request)?;
        let Registration::Created(task_id) = registration else {
            tracing::debug!(
                "Request already in flight as task {}",
                registration.task_id()
            );
            return Ok(registration);
        };

        if self.queue.send(task_id).is_err() {
            self.registry.cancel(task_id);
            return Err(AppError::service_unavailable("Dispatch worker is not running"));
        }

        tracing::debug!("Queued dispatch task {}", task_id);
        Ok(registration)
    }

    /// Current state of a task.
    pub fn status(&self, task_id: TaskId) -> Option<DispatchTask> {
        self.registry.snapshot(task_id)
    }

    /// Cancel a task that has not finished. Returns whether it was cancelled.
    pub fn cancel(&self, task_id: TaskId) -> bool {
        let cancelled = self.registry.cancel(task_id);
        if cancelled {
            tracing::info!("Dispatch task {} cancelled", task_id);
        }
        cancelled
    }

    /// The shared registry.
    pub fn registry(&self) -> Arc<TaskRegistry> {
        Arc::clone(&self.registry)
    }

    /// Stop accepting work and abandon pending tasks. Await the handle
    /// returned by [`Dispatcher::start`] to wait for running attempts.
    pub fn shutdown(&self) {
        tracing::info!("Shutting down dispatcher");
        self.registry.shutdown();
    }
}
