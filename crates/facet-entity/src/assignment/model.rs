//! Assignment reference and expiring-assignment view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use facet_core::types::AssignmentId;

use super::kind::{AssignmentKind, AssignmentStatus};
use crate::person::Person;

/// Points at one assignment row of a given variant.
///
/// Carried by dispatch requests so the worker can set the idempotency flag
/// on the exact row that triggered the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentRef {
    /// Which assignment table the id belongs to.
    pub kind: AssignmentKind,
    /// Row identifier.
    pub id: AssignmentId,
}

impl AssignmentRef {
    /// Create a new reference.
    pub fn new(kind: AssignmentKind, id: AssignmentId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for AssignmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// An assignment due to expire, joined with its holder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiringAssignment {
    /// The assignment row.
    pub reference: AssignmentRef,
    /// Person holding the role.
    pub holder: Person,
    /// Department name (leadership) or subject name (teaching).
    pub context: String,
    /// Position title, for teaching terms.
    pub position: Option<String>,
    /// Last day of the term.
    pub end_date: NaiveDate,
    /// Whether a renewal notice has already been delivered.
    pub notified: bool,
    /// Row status.
    pub status: AssignmentStatus,
}

impl ExpiringAssignment {
    /// Whether the term is eligible for a renewal notice within `[from, until]`.
    pub fn is_due(&self, from: NaiveDate, until: NaiveDate) -> bool {
        self.status == AssignmentStatus::Active
            && !self.notified
            && self.end_date >= from
            && self.end_date <= until
    }
}
