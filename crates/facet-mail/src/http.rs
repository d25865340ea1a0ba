//! Transport for JSON mail relay APIs.
//!
//! Posts `{from, to, subject, text}` with a bearer key and maps the
//! response onto [`DeliveryError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use facet_core::config::mail::MailConfig;
use facet_core::error::{AppError, ErrorKind};

use crate::error::DeliveryError;
use crate::message::MailMessage;
use crate::transport::MailTransport;

#[derive(Debug, Serialize)]
struct SendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Sends through an HTTP mail API.
#[derive(Debug, Clone)]
pub struct HttpMailTransport {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpMailTransport {
    /// Build the HTTP client from `[mail]` settings.
    pub fn new(config: &MailConfig) -> Result<Self, AppError> {
        if config.api_url.trim().is_empty() {
            return Err(AppError::configuration(
                "mail.api_url is required for the http provider",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build mail HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, message: &MailMessage) -> Result<(), DeliveryError> {
        let payload = SendPayload {
            from: &message.from,
            to: [&message.to],
            subject: &message.subject,
            text: &message.body,
        };

        let mut request = self.client.post(&self.api_url).json(&payload);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() || e.is_request() {
                DeliveryError::Transient(format!("mail relay unreachable: {e}"))
            } else {
                DeliveryError::Permanent(format!("mail request failed: {e}"))
            }
        })?;

        let status = response.status();
        match classify_status(status) {
            None => {
                debug!(to = %message.to, %status, "Mail relay accepted message");
                Ok(())
            }
            Some(err) => {
                let body = response.text().await.unwrap_or_default();
                warn!(to = %message.to, %status, body = %body, "Mail relay rejected message");
                Err(err)
            }
        }
    }
}

/// Map a relay response status to a delivery error, `None` on success.
///
/// 408, 429 and 5xx are transient; every other non-success status is
/// permanent.
pub fn classify_status(status: StatusCode) -> Option<DeliveryError> {
    if status.is_success() {
        return None;
    }
    let detail = format!("mail relay returned {status}");
    if status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
    {
        Some(DeliveryError::Transient(detail))
    } else {
        Some(DeliveryError::Permanent(detail))
    }
}
