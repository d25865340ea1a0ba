//! Store traits consumed by the scanner, dispatcher, and cleanup job.
//!
//! The relational schema is owned by the surrounding CRUD system; these
//! traits expose only the reads and single-row writes this service needs.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use facet_core::result::AppResult;
use facet_core::types::{NotificationId, PersonId};
use facet_entity::assignment::{AssignmentKind, AssignmentRef, ExpiringAssignment};
use facet_entity::notification::Notification;
use facet_entity::person::Person;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::repositories::{AssignmentRepository, NotificationRepository, PersonRepository};

/// Read access to notification recipients.
#[async_trait]
pub trait PersonStore: Send + Sync + Debug {
    /// Look up a person by id.
    async fn find_by_id(&self, id: PersonId) -> AppResult<Option<Person>>;
}

/// Read access to assignment terms plus the idempotency flag write.
#[async_trait]
pub trait AssignmentStore: Send + Sync + Debug {
    /// Active, un-notified terms of `kind` whose end date lies in
    /// `[from, until]` (both inclusive). Rows without an end date never match.
    async fn find_expiring(
        &self,
        kind: AssignmentKind,
        from: NaiveDate,
        until: NaiveDate,
    ) -> AppResult<Vec<ExpiringAssignment>>;

    /// Set `notified = true` only if it is currently false.
    ///
    /// Returns `true` when this call performed the transition and `false`
    /// when the row was already flagged or does not exist.
    async fn mark_notified(&self, reference: AssignmentRef) -> AppResult<bool>;
}

/// The persisted notification log.
#[async_trait]
pub trait NotificationStore: Send + Sync + Debug {
    /// Append an unread notification for `person_id`.
    async fn create(&self, person_id: PersonId, message: &str) -> AppResult<Notification>;

    /// Remove a single notification. Returns whether a row was deleted.
    async fn delete(&self, id: NotificationId) -> AppResult<bool>;

    /// Fetch a notification by id.
    async fn find_by_id(&self, id: NotificationId) -> AppResult<Option<Notification>>;

    /// Set the read flag. Returns whether the notification exists.
    async fn mark_read(&self, id: NotificationId) -> AppResult<bool>;

    /// Notifications for a person, newest first.
    async fn list_for_person(&self, person_id: PersonId, limit: i64)
    -> AppResult<Vec<Notification>>;

    /// Delete every notification created at or before `cutoff`.
    async fn delete_created_at_or_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// The three stores bundled for constructor injection.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Recipients.
    pub persons: Arc<dyn PersonStore>,
    /// Assignment terms.
    pub assignments: Arc<dyn AssignmentStore>,
    /// Notification log.
    pub notifications: Arc<dyn NotificationStore>,
}

impl Stores {
    /// Stores backed by PostgreSQL repositories sharing one pool.
    pub fn postgres(db: &DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            persons: Arc::new(PersonRepository::new(pool.clone())),
            assignments: Arc::new(AssignmentRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool)),
        }
    }

    /// Stores backed by a single in-memory store.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            persons: store.clone(),
            assignments: store.clone(),
            notifications: store,
        }
    }
}
