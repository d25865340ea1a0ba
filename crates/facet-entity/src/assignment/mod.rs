//! Assignment domain entities: time-bounded roles held by a person.

pub mod kind;
pub mod model;

pub use kind::{AssignmentKind, AssignmentStatus};
pub use model::{AssignmentRef, ExpiringAssignment};
