//! Shared value types.

pub mod id;

pub use id::{AssignmentId, NotificationId, PersonId, TaskId};
