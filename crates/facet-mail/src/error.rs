//! Delivery failure classification.

use thiserror::Error;

/// Why a send did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Network trouble, timeouts, or the relay being busy. Worth retrying.
    #[error("transient delivery failure: {0}")]
    Transient(String),
    /// Rejected address, bad credentials, or a malformed request.
    #[error("permanent delivery failure: {0}")]
    Permanent(String),
}

impl DeliveryError {
    /// Whether a later attempt could succeed without outside changes.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
