//! Transport selection from configuration.

use std::sync::Arc;

use tracing::info;

use facet_core::config::mail::MailConfig;
use facet_core::error::AppError;
use facet_core::result::AppResult;

use crate::http::HttpMailTransport;
use crate::log::LogMailTransport;
use crate::transport::MailTransport;

/// Build the transport named by `mail.provider`.
pub fn build_transport(config: &MailConfig) -> AppResult<Arc<dyn MailTransport>> {
    let transport: Arc<dyn MailTransport> = match config.provider.as_str() {
        "http" => Arc::new(HttpMailTransport::new(config)?),
        "log" => Arc::new(LogMailTransport::new()),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown mail provider '{other}' (expected 'http' or 'log')"
            )));
        }
    };

    info!(provider = transport.name(), from = %config.from_address, "Mail transport ready");
    Ok(transport)
}
