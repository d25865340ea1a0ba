//! HTTP request handlers.

pub mod dispatch;
pub mod expiration;
pub mod health;
pub mod jobs;
pub mod notification;
