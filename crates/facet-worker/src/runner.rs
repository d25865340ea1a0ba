//! Worker runner: pulls task ids off the queue and processes them on a
//! bounded pool.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Semaphore, mpsc};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing;

use facet_core::types::TaskId;
use facet_entity::dispatch::{DispatchOutcome, DispatchTask};

use crate::error::DispatchError;
use crate::executor::DispatchExecutor;
use crate::registry::TaskRegistry;
use crate::retry::RetryPolicy;

/// Consumes the dispatch queue until the registry shuts down.
#[derive(Debug)]
pub struct WorkerRunner {
    registry: Arc<TaskRegistry>,
    executor: Arc<DispatchExecutor>,
    retry: RetryPolicy,
    queue_tx: mpsc::UnboundedSender<TaskId>,
    queue_rx: mpsc::UnboundedReceiver<TaskId>,
    concurrency: usize,
    shutdown_grace: Duration,
    result_ttl: Option<Duration>,
}

impl WorkerRunner {
    /// Create a new runner. `queue_tx` is used to requeue tasks after their
    /// backoff delay.
    pub fn new(
        registry: Arc<TaskRegistry>,
        executor: Arc<DispatchExecutor>,
        retry: RetryPolicy,
        queue: (mpsc::UnboundedSender<TaskId>, mpsc::UnboundedReceiver<TaskId>),
        concurrency: usize,
        shutdown_grace: Duration,
    ) -> Self {
        Self {
            registry,
            executor,
            retry,
            queue_tx: queue.0,
            queue_rx: queue.1,
            concurrency: concurrency.max(1),
            shutdown_grace,
            result_ttl: None,
        }
    }

    /// Periodically drop finished tasks older than `ttl` while running.
    pub fn with_result_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.result_ttl = ttl;
        self
    }

    /// Run until shutdown, then wait up to the grace period for in-flight
    /// attempts to settle.
    pub async fn run(mut self) {
        tracing::info!(
            "Dispatch worker started with concurrency={}, max_retries={}",
            self.concurrency,
            self.retry.max_retries
        );

        let shutdown = self.registry.shutdown_token();
        if let Some(ttl) = self.result_ttl {
            self.spawn_result_sweeper(ttl, shutdown.clone());
        }
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        loop {
            let permit = tokio::select! {
                _ = shutdown.cancelled() => break,
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(_) => break,
                },
            };

            let task_id = tokio::select! {
                _ = shutdown.cancelled() => break,
                next = self.queue_rx.recv() => match next {
                    Some(id) => id,
                    None => break,
                },
            };

            let ctx = AttemptContext {
                registry: Arc::clone(&self.registry),
                executor: Arc::clone(&self.executor),
                retry: self.retry.clone(),
                queue_tx: self.queue_tx.clone(),
            };

            tokio::spawn(async move {
                let _permit = permit;
                ctx.process(task_id).await;
            });
        }

        tracing::info!("Dispatch worker waiting for in-flight attempts to finish...");

        let permits = u32::try_from(self.concurrency).unwrap_or(u32::MAX);
        if tokio::time::timeout(self.shutdown_grace, semaphore.acquire_many(permits))
            .await
            .is_err()
        {
            tracing::warn!(
                "Dispatch worker grace period of {:?} elapsed with attempts still running",
                self.shutdown_grace
            );
        }

        tracing::info!("Dispatch worker shut down");
    }

    fn spawn_result_sweeper(&self, ttl: Duration, shutdown: CancellationToken) {
        let registry = Arc::clone(&self.registry);
        let period = (ttl / 2).clamp(Duration::from_millis(50), Duration::from_secs(300));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        let before = chrono::Duration::from_std(ttl)
                            .ok()
                            .and_then(|ttl| Utc::now().checked_sub_signed(ttl))
                            .unwrap_or(DateTime::<Utc>::MIN_UTC);
                        registry.purge_finished(before);
                    }
                }
            }
        });
    }
}

#[derive(Debug)]
struct AttemptContext {
    registry: Arc<TaskRegistry>,
    executor: Arc<DispatchExecutor>,
    retry: RetryPolicy,
    queue_tx: mpsc::UnboundedSender<TaskId>,
}

impl AttemptContext {
    async fn process(self, task_id: TaskId) {
        let Some((task, cancel)) = self.registry.begin(task_id) else {
            tracing::trace!("Task {} is no longer pending, skipping", task_id);
            return;
        };

        tracing::debug!(
            "Processing dispatch task {} (attempt {}, retry_count {})",
            task_id,
            task.attempts,
            task.retry_count
        );

        let result = self.executor.attempt(&task, &cancel).await;
        self.record(&task, result, cancel);
        self.registry.settle(task_id);
    }

    fn record(
        &self,
        task: &DispatchTask,
        result: Result<DispatchOutcome, DispatchError>,
        cancel: CancellationToken,
    ) {
        let task_id = task.id;
        let err = match result {
            Ok(outcome) => {
                if !self.registry.succeed(task_id, outcome) {
                    tracing::warn!("Task {} was cancelled after its message was delivered", task_id);
                }
                return;
            }
            Err(err) => err,
        };

        match err {
            DispatchError::Cancelled => {
                self.registry.cancel(task_id);
                tracing::info!("Task {} cancelled during attempt {}", task_id, task.attempts);
            }
            err if err.is_retryable() && self.retry.allows_retry(task.retry_count) => {
                let retry = task.retry_count + 1;
                let delay = self.retry.delay_for_retry(retry);
                let next_at = chrono::Duration::from_std(delay)
                    .ok()
                    .and_then(|d| Utc::now().checked_add_signed(d))
                    .unwrap_or_else(Utc::now);

                tracing::warn!(
                    "Task {} failed (transient): {}; retry {}/{} in {:?}",
                    task_id,
                    err,
                    retry,
                    self.retry.max_retries,
                    delay
                );

                if !self.registry.schedule_retry(task_id, err.to_failure(), next_at) {
                    return;
                }
                self.requeue_after(task_id, delay, cancel);
            }
            err if err.is_retryable() => {
                let exhausted = DispatchError::DispatchFailed {
                    attempts: task.attempts,
                    last_error: err.to_string(),
                };
                tracing::error!("Task {} failed permanently: {}", task_id, exhausted);
                self.registry.fail(task_id, exhausted.to_failure());
            }
            err => {
                tracing::error!("Task {} failed permanently: {}", task_id, err);
                self.registry.fail(task_id, err.to_failure());
            }
        }
    }

    fn requeue_after(
        &self,
        task_id: TaskId,
        delay: Duration,
        cancel: CancellationToken,
    ) {
        let registry = Arc::clone(&self.registry);
        let queue_tx = self.queue_tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    registry.cancel(task_id);
                }
                _ = tokio::time::sleep(delay) => {
                    if queue_tx.send(task_id).is_err() {
                        registry.cancel(task_id);
                    }
                }
            }
        });
    }
}
