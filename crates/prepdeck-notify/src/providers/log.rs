//! Log-only delivery providers for development and tests.
//!
//! Messages are written to the application log instead of leaving the
//! process. OTP codes still reach the operator through the log line.

use async_trait::async_trait;
use tracing::info;

use prepdeck_core::result::AppResult;

use crate::message::{EmailMessage, SmsMessage};
use crate::sender::{EmailSender, SmsSender};

/// Email provider that logs messages instead of delivering them.
#[derive(Debug, Default, Clone)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    fn provider_type(&self) -> &str {
        "log"
    }

    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "Email (log provider)"
        );
        Ok(())
    }
}

/// SMS provider that logs messages instead of delivering them.
#[derive(Debug, Default, Clone)]
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    fn provider_type(&self) -> &str {
        "log"
    }

    async fn send(&self, message: &SmsMessage) -> AppResult<()> {
        info!(
            to = %message.to,
            body = %message.body,
            "SMS (log provider)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message;

    #[tokio::test]
    async fn test_log_email_send_succeeds() {
        let sender = LogEmailSender;
        let msg = message::otp_email("a@example.com", "123456", 10);
        assert!(sender.send(&msg).await.is_ok());
        assert_eq!(sender.provider_type(), "log");
    }

    #[tokio::test]
    async fn test_log_sms_send_succeeds() {
        let sender = LogSmsSender;
        let msg = message::otp_sms("+15550001111", "123456", 10);
        assert!(sender.send(&msg).await.is_ok());
    }
}
