//! Dispatch error taxonomy.

use facet_core::error::AppError;
use facet_core::types::PersonId;
use facet_entity::dispatch::DispatchFailure;
use facet_mail::DeliveryError;

/// Why a single dispatch attempt or task did not succeed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DispatchError {
    /// The recipient id does not exist.
    #[error("Recipient {0} not found")]
    RecipientNotFound(PersonId),

    /// The recipient has no usable email address.
    #[error("Recipient {0} has no email address on file")]
    NoEmail(PersonId),

    /// The mail transport failed in a way that may clear up.
    #[error("Transient delivery failure: {0}")]
    TransientDelivery(String),

    /// The mail transport rejected the message.
    #[error("Permanent delivery failure: {0}")]
    PermanentDelivery(String),

    /// Retries exhausted.
    #[error("Dispatch failed after {attempts} attempts: {last_error}")]
    DispatchFailed {
        /// Attempts made, including the first.
        attempts: u32,
        /// Error from the final attempt.
        last_error: String,
    },

    /// The task was cancelled while it waited or ran.
    #[error("Dispatch cancelled")]
    Cancelled,

    /// A store read or write failed.
    #[error("Store error: {0}")]
    Store(#[from] AppError),
}

impl DispatchError {
    /// Whether the retry policy applies to this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TransientDelivery(_) => true,
            Self::Store(err) => err.is_transient(),
            _ => false,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RecipientNotFound(_) => "RECIPIENT_NOT_FOUND",
            Self::NoEmail(_) => "NO_EMAIL",
            Self::TransientDelivery(_) => "TRANSIENT_DELIVERY",
            Self::PermanentDelivery(_) => "PERMANENT_DELIVERY",
            Self::DispatchFailed { .. } => "DISPATCH_FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Store(_) => "STORE",
        }
    }

    /// Form recorded on the task.
    pub fn to_failure(&self) -> DispatchFailure {
        DispatchFailure {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

impl From<DeliveryError> for DispatchError {
    fn from(err: DeliveryError) -> Self {
        match err {
            DeliveryError::Transient(msg) => Self::TransientDelivery(msg),
            DeliveryError::Permanent(msg) => Self::PermanentDelivery(msg),
        }
    }
}
