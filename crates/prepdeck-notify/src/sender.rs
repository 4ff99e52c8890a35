//! Delivery traits implemented by each provider.

use async_trait::async_trait;

use prepdeck_core::result::AppResult;

use crate::message::{EmailMessage, SmsMessage};

/// Trait for email delivery backends.
#[async_trait]
pub trait EmailSender: Send + Sync + std::fmt::Debug + 'static {
    /// Provider identifier for logs and health reporting.
    fn provider_type(&self) -> &str;

    /// Deliver a single email message.
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}

/// Trait for SMS delivery backends.
#[async_trait]
pub trait SmsSender: Send + Sync + std::fmt::Debug + 'static {
    /// Provider identifier for logs and health reporting.
    fn provider_type(&self) -> &str;

    /// Deliver a single SMS message.
    async fn send(&self, message: &SmsMessage) -> AppResult<()>;
}
