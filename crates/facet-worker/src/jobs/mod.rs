//! Scheduled job implementations.

pub mod cleanup;
pub mod expiration;

pub use cleanup::{CleanupReport, NotificationCleanupJob};
pub use expiration::{ExpirationScanner, ScanReport};
