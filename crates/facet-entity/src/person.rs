//! Person entity (notification recipient).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use facet_core::types::PersonId;

/// A human recipient. Owned by the surrounding CRUD system; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Person {
    /// Unique person identifier.
    pub id: PersonId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address, if one is on file.
    pub email: Option<String>,
}

impl Person {
    /// Display name as "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// The email address, if present and not blank.
    pub fn deliverable_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}
