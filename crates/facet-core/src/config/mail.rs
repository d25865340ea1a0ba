//! Outbound mail transport configuration.

use serde::{Deserialize, Serialize};

/// Mail transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Transport provider: `"http"` (mail relay API) or `"log"` (development).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Sender address used for every outgoing message.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Mail relay endpoint accepting JSON send requests.
    #[serde(default)]
    pub api_url: String,
    /// Bearer token for the mail relay.
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            from_address: default_from_address(),
            api_url: String::new(),
            api_key: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_provider() -> String {
    "log".to_string()
}

fn default_from_address() -> String {
    "noreply@facet.example.edu".to_string()
}

fn default_timeout() -> u64 {
    10
}
