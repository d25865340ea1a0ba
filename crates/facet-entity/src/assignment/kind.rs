//! Assignment variant and status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two assignment variants monitored for expiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    /// A department leadership term (department head).
    DepartmentLeadership,
    /// A subject teaching term (professor assigned to a subject).
    Teaching,
}

impl AssignmentKind {
    /// Every variant, in scan order.
    pub const ALL: [AssignmentKind; 2] = [Self::DepartmentLeadership, Self::Teaching];

    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DepartmentLeadership => "department_leadership",
            Self::Teaching => "teaching",
        }
    }
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Soft-delete status carried by assignment rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    /// The term is in force.
    Active,
    /// The term was withdrawn or soft-deleted.
    Inactive,
}

impl AssignmentStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
