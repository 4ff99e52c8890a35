//! Email and SMS delivery configuration.

use serde::{Deserialize, Serialize};

/// Top-level delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotifyConfig {
    /// Email delivery settings.
    #[serde(default)]
    pub email: EmailConfig,
    /// SMS delivery settings.
    #[serde(default)]
    pub sms: SmsConfig,
}

/// Email gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Delivery provider: `"log"` or `"http"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// HTTP gateway endpoint URL.
    #[serde(default)]
    pub gateway_url: String,
    /// API key sent as a bearer token to the gateway.
    #[serde(default)]
    pub api_key: String,
    /// Sender address placed in outgoing messages.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Gateway request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            gateway_url: String::new(),
            api_key: String::new(),
            from_address: default_from_address(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// SMS gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    /// Delivery provider: `"log"` or `"http"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// HTTP gateway endpoint URL.
    #[serde(default)]
    pub gateway_url: String,
    /// API key sent as a bearer token to the gateway.
    #[serde(default)]
    pub api_key: String,
    /// Sender ID placed in outgoing messages.
    #[serde(default = "default_sender_id")]
    pub sender_id: String,
    /// Gateway request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            gateway_url: String::new(),
            api_key: String::new(),
            sender_id: default_sender_id(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_provider() -> String {
    "log".to_string()
}

fn default_from_address() -> String {
    "no-reply@prepdeck.app".to_string()
}

fn default_sender_id() -> String {
    "PREPDECK".to_string()
}

fn default_timeout() -> u64 {
    10
}
