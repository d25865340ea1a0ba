//! # facet-entity
//!
//! Domain entity models. Database rows derive `sqlx::FromRow`; every
//! entity derives `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod assignment;
pub mod dispatch;
pub mod notification;
pub mod person;
