//! Transport that writes messages to the log instead of sending them.

use async_trait::async_trait;
use tracing::info;

use crate::error::DeliveryError;
use crate::message::MailMessage;
use crate::transport::MailTransport;

/// Development transport. Every send succeeds.
#[derive(Debug, Clone, Default)]
pub struct LogMailTransport;

impl LogMailTransport {
    /// Create a new log transport.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MailTransport for LogMailTransport {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, message: &MailMessage) -> Result<(), DeliveryError> {
        info!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "Email (log transport)"
        );
        Ok(())
    }
}
