//! DashMap-backed implementation of every store trait.
//!
//! Used by the `memory` database provider and by tests. Each map entry is
//! guarded by its shard lock, which gives `mark_notified` the same
//! single-row compare-and-set behaviour as the SQL `UPDATE ... WHERE
//! notified = FALSE`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use tracing::debug;

use facet_core::result::AppResult;
use facet_core::types::{AssignmentId, NotificationId, PersonId};
use facet_entity::assignment::{
    AssignmentKind, AssignmentRef, AssignmentStatus, ExpiringAssignment,
};
use facet_entity::notification::Notification;
use facet_entity::person::Person;

use crate::store::{AssignmentStore, NotificationStore, PersonStore};

/// One assignment row as held by the memory backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRecord {
    /// Person holding the role.
    pub holder: PersonId,
    /// Department or subject name.
    pub context: String,
    /// Position title, for teaching terms.
    pub position: Option<String>,
    /// Last day of the term, if set.
    pub end_date: Option<NaiveDate>,
    /// Row status.
    pub status: AssignmentStatus,
    /// Idempotency flag.
    pub notified: bool,
}

impl AssignmentRecord {
    /// An active, un-notified term ending on `end_date`.
    pub fn active(holder: PersonId, context: impl Into<String>, end_date: NaiveDate) -> Self {
        Self {
            holder,
            context: context.into(),
            position: None,
            end_date: Some(end_date),
            status: AssignmentStatus::Active,
            notified: false,
        }
    }
}

/// In-memory persons, assignments, and notifications.
#[derive(Debug, Default)]
pub struct MemoryStore {
    persons: DashMap<PersonId, Person>,
    assignments: DashMap<AssignmentRef, AssignmentRecord>,
    notifications: DashMap<NotificationId, Notification>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a person.
    pub fn insert_person(&self, person: Person) {
        self.persons.insert(person.id, person);
    }

    /// Insert an assignment under a fresh id.
    pub fn insert_assignment(&self, kind: AssignmentKind, record: AssignmentRecord) -> AssignmentRef {
        let reference = AssignmentRef::new(kind, AssignmentId::new());
        self.assignments.insert(reference, record);
        reference
    }

    /// Current state of an assignment.
    pub fn get_assignment(&self, reference: AssignmentRef) -> Option<AssignmentRecord> {
        self.assignments.get(&reference).map(|r| r.value().clone())
    }

    /// Overwrite the idempotency flag, as an external renewal edit would.
    pub fn set_notified(&self, reference: AssignmentRef, notified: bool) -> bool {
        match self.assignments.get_mut(&reference) {
            Some(mut record) => {
                record.notified = notified;
                true
            }
            None => false,
        }
    }

    /// Insert a notification with an explicit creation time.
    pub fn insert_notification_at(
        &self,
        person_id: PersonId,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> Notification {
        let notification = Notification {
            id: NotificationId::new(),
            person_id,
            message: message.to_string(),
            is_read: false,
            created_at,
        };
        self.notifications
            .insert(notification.id, notification.clone());
        notification
    }

    /// Number of stored notifications.
    pub fn notification_count(&self) -> usize {
        self.notifications.len()
    }
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn find_by_id(&self, id: PersonId) -> AppResult<Option<Person>> {
        Ok(self.persons.get(&id).map(|p| p.value().clone()))
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn find_expiring(
        &self,
        kind: AssignmentKind,
        from: NaiveDate,
        until: NaiveDate,
    ) -> AppResult<Vec<ExpiringAssignment>> {
        let mut due: Vec<ExpiringAssignment> = self
            .assignments
            .iter()
            .filter(|entry| entry.key().kind == kind)
            .filter_map(|entry| {
                let record = entry.value();
                let end_date = record.end_date?;
                let holder = self.persons.get(&record.holder)?.value().clone();
                Some(ExpiringAssignment {
                    reference: *entry.key(),
                    holder,
                    context: record.context.clone(),
                    position: record.position.clone(),
                    end_date,
                    notified: record.notified,
                    status: record.status,
                })
            })
            .filter(|a| a.is_due(from, until))
            .collect();

        due.sort_by(|a, b| {
            a.end_date
                .cmp(&b.end_date)
                .then(a.reference.id.cmp(&b.reference.id))
        });
        Ok(due)
    }

    async fn mark_notified(&self, reference: AssignmentRef) -> AppResult<bool> {
        let Some(mut record) = self.assignments.get_mut(&reference) else {
            return Ok(false);
        };
        if record.notified {
            return Ok(false);
        }
        record.notified = true;
        Ok(true)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(&self, person_id: PersonId, message: &str) -> AppResult<Notification> {
        Ok(self.insert_notification_at(person_id, message, Utc::now()))
    }

    async fn delete(&self, id: NotificationId) -> AppResult<bool> {
        Ok(self.notifications.remove(&id).is_some())
    }

    async fn find_by_id(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        Ok(self.notifications.get(&id).map(|n| n.value().clone()))
    }

    async fn mark_read(&self, id: NotificationId) -> AppResult<bool> {
        match self.notifications.get_mut(&id) {
            Some(mut n) => {
                n.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_for_person(
        &self,
        person_id: PersonId,
        limit: i64,
    ) -> AppResult<Vec<Notification>> {
        let mut list: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|n| n.person_id == person_id)
            .map(|n| n.value().clone())
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list.truncate(limit.max(0) as usize);
        Ok(list)
    }

    async fn delete_created_at_or_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let before = self.notifications.len();
        self.notifications.retain(|_, n| n.created_at > cutoff);
        let deleted = before.saturating_sub(self.notifications.len()) as u64;
        debug!(deleted, %cutoff, "Removed notifications from memory store");
        Ok(deleted)
    }
}
