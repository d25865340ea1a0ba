//! Typed identifiers.
//!
//! Every row the service touches is keyed by a UUID; wrapping each in its
//! own type keeps a `PersonId` from being passed where a `TaskId` belongs.
//! With the `sqlx` feature the wrappers bind and decode as plain `UUID`
//! columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Fresh random (v4) identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// A person who can receive notifications.
    PersonId
);

define_id!(
    /// A leadership or teaching term. Unique only within its assignment kind.
    AssignmentId
);

define_id!(
    /// A stored notification row.
    NotificationId
);

define_id!(
    /// A dispatch task in the in-memory registry.
    TaskId
);
