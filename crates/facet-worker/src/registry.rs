//! Task status registry.
//!
//! Tracks every submitted dispatch by [`TaskId`] and indexes non-terminal
//! tasks by their originating assignment so one assignment never has two
//! requests in flight.
//!
//! The registry lives in process memory only. Status is lost on restart
//! and tasks that were pending or retrying are not resumed; the next
//! expiration scan finds their assignments still un-notified and submits
//! them again.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio_util::sync::CancellationToken;
use tracing;

use facet_core::error::AppError;
use facet_core::result::AppResult;
use facet_core::types::TaskId;
use facet_entity::assignment::AssignmentRef;
use facet_entity::dispatch::{
    DispatchFailure, DispatchOutcome, DispatchRequest, DispatchStatus, DispatchTask,
};

/// Result of registering a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A new task was created and must be queued.
    Created(TaskId),
    /// The origin already has a task in flight; nothing new was created.
    InFlight(TaskId),
}

impl Registration {
    /// The task id either way.
    pub fn task_id(&self) -> TaskId {
        match self {
            Self::Created(id) | Self::InFlight(id) => *id,
        }
    }

    /// Whether a new task was created.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

#[derive(Debug)]
struct TaskEntry {
    task: DispatchTask,
    cancel: CancellationToken,
}

/// In-memory registry of dispatch tasks.
#[derive(Debug)]
pub struct TaskRegistry {
    tasks: DashMap<TaskId, TaskEntry>,
    in_flight: DashMap<AssignmentRef, TaskId>,
    root: CancellationToken,
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tasks: DashMap::new(),
            in_flight: DashMap::new(),
            root: CancellationToken::new(),
        }
    }

    /// Token cancelled when the registry shuts down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.root.clone()
    }

    /// Whether [`TaskRegistry::shutdown`] has been called.
    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Record a new pending task, unless its origin already has one in flight.
    pub fn register(&self, request: DispatchRequest) -> AppResult<Registration> {
        if self.is_shut_down() {
            return Err(AppError::service_unavailable(
                "Dispatcher is shutting down",
            ));
        }

        let Some(origin) = request.origin else {
            return Ok(Registration::Created(self.insert(request)));
        };

        match self.in_flight.entry(origin) {
            Entry::Occupied(existing) => Ok(Registration::InFlight(*existing.get())),
            Entry::Vacant(slot) => {
                let id = self.insert(request);
                slot.insert(id);
                Ok(Registration::Created(id))
            }
        }
    }

    fn insert(&self, request: DispatchRequest) -> TaskId {
        let task = DispatchTask::new(request);
        let id = task.id;
        self.tasks.insert(
            id,
            TaskEntry {
                task,
                cancel: self.root.child_token(),
            },
        );
        id
    }

    /// Hand a pending task to a worker: `pending → in_progress`.
    ///
    /// Returns the updated task and its cancellation token, or `None` when
    /// the task is unknown or no longer pending.
    pub fn begin(&self, id: TaskId) -> Option<(DispatchTask, CancellationToken)> {
        let mut entry = self.tasks.get_mut(&id)?;
        if entry.task.status != DispatchStatus::Pending {
            return None;
        }
        let now = Utc::now();
        entry.task.status = DispatchStatus::InProgress;
        entry.task.attempts += 1;
        entry.task.next_attempt_at = None;
        entry.task.updated_at = now;
        Some((entry.task.clone(), entry.cancel.clone()))
    }

    /// Put an in-progress task back to pending for a later retry.
    pub fn schedule_retry(
        &self,
        id: TaskId,
        failure: DispatchFailure,
        next_attempt_at: DateTime<Utc>,
    ) -> bool {
        let Some(mut entry) = self.tasks.get_mut(&id) else {
            return false;
        };
        if entry.task.status != DispatchStatus::InProgress {
            return false;
        }
        entry.task.status = DispatchStatus::Pending;
        entry.task.retry_count += 1;
        entry.task.failure = Some(failure);
        entry.task.next_attempt_at = Some(next_attempt_at);
        entry.task.updated_at = Utc::now();
        true
    }

    /// Record a successful delivery.
    pub fn succeed(&self, id: TaskId, outcome: DispatchOutcome) -> bool {
        self.finish(id, DispatchStatus::Succeeded, |task| {
            task.outcome = Some(outcome);
            task.failure = None;
        })
    }

    /// Record a terminal failure.
    pub fn fail(&self, id: TaskId, failure: DispatchFailure) -> bool {
        self.finish(id, DispatchStatus::Failed, |task| {
            task.failure = Some(failure);
        })
    }

    /// Cancel a non-terminal task and wake anything waiting on it.
    pub fn cancel(&self, id: TaskId) -> bool {
        let cancelled = self.finish(id, DispatchStatus::Cancelled, |task| {
            task.next_attempt_at = None;
        });
        if cancelled {
            if let Some(entry) = self.tasks.get(&id) {
                entry.cancel.cancel();
            }
        }
        cancelled
    }

    fn finish(
        &self,
        id: TaskId,
        status: DispatchStatus,
        apply: impl FnOnce(&mut DispatchTask),
    ) -> bool {
        let (origin, running) = {
            let Some(mut entry) = self.tasks.get_mut(&id) else {
                return false;
            };
            if entry.task.status.is_terminal() {
                return false;
            }
            let running = entry.task.status == DispatchStatus::InProgress;
            let now = Utc::now();
            apply(&mut entry.task);
            entry.task.status = status;
            entry.task.updated_at = now;
            entry.task.finished_at = Some(now);
            (entry.task.request.origin, running)
        };

        // A running attempt may still flag its assignment; the worker
        // releases the origin through `settle` once the attempt returns.
        if status == DispatchStatus::Cancelled && running {
            return true;
        }
        if let Some(origin) = origin {
            self.in_flight.remove_if(&origin, |_, owner| *owner == id);
        }
        true
    }

    /// Release the origin of a terminal task after its worker has
    /// finished with it.
    pub fn settle(&self, id: TaskId) {
        let origin = match self.tasks.get(&id) {
            Some(entry) if entry.task.status.is_terminal() => entry.task.request.origin,
            _ => return,
        };
        if let Some(origin) = origin {
            self.in_flight.remove_if(&origin, |_, owner| *owner == id);
        }
    }

    /// Copy of a task's current state.
    pub fn snapshot(&self, id: TaskId) -> Option<DispatchTask> {
        self.tasks.get(&id).map(|entry| entry.task.clone())
    }

    /// The non-terminal task for an assignment, if any.
    pub fn in_flight_for(&self, origin: AssignmentRef) -> Option<TaskId> {
        self.in_flight.get(&origin).map(|id| *id)
    }

    /// Drop terminal tasks that finished at or before `before`.
    pub fn purge_finished(&self, before: DateTime<Utc>) -> usize {
        let len = self.tasks.len();
        self.tasks.retain(|_, entry| match entry.task.finished_at {
            Some(finished) => finished > before,
            None => true,
        });
        let purged = len.saturating_sub(self.tasks.len());
        tracing::debug!("Purged {} finished dispatch tasks", purged);
        purged
    }

    /// Number of tracked tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks are tracked.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks in `status`.
    pub fn count_with_status(&self, status: DispatchStatus) -> usize {
        self.tasks
            .iter()
            .filter(|entry| entry.task.status == status)
            .count()
    }

    /// Stop accepting work, cancel every token, and mark pending tasks
    /// cancelled. In-progress tasks observe their token and settle on
    /// their own. Returns how many pending tasks were abandoned.
    pub fn shutdown(&self) -> usize {
        self.root.cancel();

        let pending: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|entry| entry.task.status == DispatchStatus::Pending)
            .map(|entry| *entry.key())
            .collect();

        let abandoned = pending.into_iter().filter(|id| self.cancel(*id)).count();
        if abandoned > 0 {
            tracing::warn!(
                "Abandoned {} pending dispatch tasks at shutdown; the next expiration scan will resubmit them",
                abandoned
            );
        }
        abandoned
    }
}
