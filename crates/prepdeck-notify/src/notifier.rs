//! Notifier facade that dispatches to the configured providers.

use std::sync::Arc;

use tracing::info;

use prepdeck_core::config::notify::NotifyConfig;
use prepdeck_core::error::AppError;
use prepdeck_core::result::AppResult;

use crate::message::{EmailMessage, SmsMessage};
use crate::providers::{HttpEmailSender, HttpSmsSender, LogEmailSender, LogSmsSender};
use crate::sender::{EmailSender, SmsSender};

/// Facade over the configured email and SMS providers.
///
/// Providers are selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct Notifier {
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
}

impl Notifier {
    /// Create a notifier from delivery configuration.
    pub fn new(config: &NotifyConfig) -> AppResult<Self> {
        let email: Arc<dyn EmailSender> = match config.email.provider.as_str() {
            "log" => Arc::new(LogEmailSender),
            "http" => Arc::new(HttpEmailSender::new(&config.email)?),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown email provider: '{other}'. Supported: log, http"
                )));
            }
        };

        let sms: Arc<dyn SmsSender> = match config.sms.provider.as_str() {
            "log" => Arc::new(LogSmsSender),
            "http" => Arc::new(HttpSmsSender::new(&config.sms)?),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown SMS provider: '{other}'. Supported: log, http"
                )));
            }
        };

        info!(
            email = email.provider_type(),
            sms = sms.provider_type(),
            "Initialized delivery providers"
        );
        Ok(Self { email, sms })
    }

    /// Create a notifier from existing senders (for testing).
    pub fn from_senders(email: Arc<dyn EmailSender>, sms: Arc<dyn SmsSender>) -> Self {
        Self { email, sms }
    }

    /// Deliver an email through the configured provider.
    pub async fn send_email(&self, message: &EmailMessage) -> AppResult<()> {
        self.email.send(message).await
    }

    /// Deliver an SMS through the configured provider.
    pub async fn send_sms(&self, message: &SmsMessage) -> AppResult<()> {
        self.sms.send(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_log_providers() {
        let notifier = Notifier::new(&NotifyConfig::default()).unwrap();
        assert_eq!(notifier.email.provider_type(), "log");
        assert_eq!(notifier.sms.provider_type(), "log");
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let mut config = NotifyConfig::default();
        config.email.provider = "carrier-pigeon".to_string();
        assert!(Notifier::new(&config).is_err());
    }
}
