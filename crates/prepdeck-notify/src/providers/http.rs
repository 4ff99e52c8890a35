//! HTTP gateway delivery providers.
//!
//! Both providers POST a JSON payload to a configured gateway endpoint
//! with the API key as a bearer token. Non-2xx responses are surfaced
//! as external-service errors.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use prepdeck_core::config::notify::{EmailConfig, SmsConfig};
use prepdeck_core::error::{AppError, ErrorKind};
use prepdeck_core::result::AppResult;

use crate::message::{EmailMessage, SmsMessage};
use crate::sender::{EmailSender, SmsSender};

#[derive(Debug, Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct SmsPayload<'a> {
    sender: &'a str,
    to: &'a str,
    message: &'a str,
}

fn build_client(timeout_seconds: u64) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Failed to build HTTP client", e)
        })
}

async fn check_gateway_response(channel: &str, response: reqwest::Response) -> AppResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let detail = response
        .text()
        .await
        .unwrap_or_else(|e| format!("failed to read gateway response: {e}"));
    Err(AppError::external_service(format!(
        "{channel} gateway returned {status}: {detail}"
    )))
}

/// Email provider that delivers through a JSON HTTP gateway.
#[derive(Debug, Clone)]
pub struct HttpEmailSender {
    client: reqwest::Client,
    gateway_url: String,
    api_key: String,
    from_address: String,
}

impl HttpEmailSender {
    /// Create a sender from email gateway configuration.
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        if config.gateway_url.is_empty() {
            return Err(AppError::configuration(
                "Email provider 'http' requires notify.email.gateway_url",
            ));
        }
        Ok(Self {
            client: build_client(config.timeout_seconds)?,
            gateway_url: config.gateway_url.clone(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    fn provider_type(&self) -> &str {
        "http"
    }

    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let payload = EmailPayload {
            from: &self.from_address,
            to: &message.to,
            subject: &message.subject,
            body: &message.body,
        };

        let response = self
            .client
            .post(&self.gateway_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Email gateway request failed", e)
            })?;

        check_gateway_response("Email", response).await?;
        debug!(to = %message.to, "Email delivered via gateway");
        Ok(())
    }
}

/// SMS provider that delivers through a JSON HTTP gateway.
#[derive(Debug, Clone)]
pub struct HttpSmsSender {
    client: reqwest::Client,
    gateway_url: String,
    api_key: String,
    sender_id: String,
}

impl HttpSmsSender {
    /// Create a sender from SMS gateway configuration.
    pub fn new(config: &SmsConfig) -> AppResult<Self> {
        if config.gateway_url.is_empty() {
            return Err(AppError::configuration(
                "SMS provider 'http' requires notify.sms.gateway_url",
            ));
        }
        Ok(Self {
            client: build_client(config.timeout_seconds)?,
            gateway_url: config.gateway_url.clone(),
            api_key: config.api_key.clone(),
            sender_id: config.sender_id.clone(),
        })
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    fn provider_type(&self) -> &str {
        "http"
    }

    async fn send(&self, message: &SmsMessage) -> AppResult<()> {
        let payload = SmsPayload {
            sender: &self.sender_id,
            to: &message.to,
            message: &message.body,
        };

        let response = self
            .client
            .post(&self.gateway_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "SMS gateway request failed", e)
            })?;

        check_gateway_response("SMS", response).await?;
        debug!(to = %message.to, "SMS delivered via gateway");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_email_requires_gateway_url() {
        let config = EmailConfig {
            provider: "http".to_string(),
            ..EmailConfig::default()
        };
        assert!(HttpEmailSender::new(&config).is_err());
    }

    #[test]
    fn test_http_sms_requires_gateway_url() {
        let config = SmsConfig {
            provider: "http".to_string(),
            ..SmsConfig::default()
        };
        assert!(HttpSmsSender::new(&config).is_err());
    }
}
