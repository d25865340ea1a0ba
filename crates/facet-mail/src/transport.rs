//! Mail transport trait.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::message::MailMessage;

/// Anything that can deliver a [`MailMessage`].
///
/// Implementations are shared across all workers and must not hold
/// per-message state.
#[async_trait]
pub trait MailTransport: Send + Sync + Debug {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Deliver one message.
    async fn send(&self, message: &MailMessage) -> Result<(), DeliveryError>;
}
