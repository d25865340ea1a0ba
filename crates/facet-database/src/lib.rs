//! # facet-database
//!
//! PostgreSQL connection management, the store traits consumed by the
//! notification subsystem, their sqlx implementations, and an in-memory
//! implementation used by tests and the `memory` provider.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use provider::{StoreBackend, connect_stores};
pub use store::{AssignmentStore, NotificationStore, PersonStore, Stores};
