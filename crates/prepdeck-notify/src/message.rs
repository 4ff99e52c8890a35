//! Message types and composition helpers.
//!
//! Services build messages here and hand them to the [`Notifier`](crate::Notifier),
//! so all user-facing copy lives in one place.

/// An email ready for delivery. The sender address is supplied by the
/// provider configuration, not the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// An SMS ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    /// Recipient phone number.
    pub to: String,
    /// Message text.
    pub body: String,
}

/// Verification code email.
pub fn otp_email(to: &str, code: &str, ttl_minutes: i64) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Your Prepdeck verification code".to_string(),
        body: format!(
            "Your verification code is {code}. It expires in {ttl_minutes} minutes.\n\n\
             If you did not request this code, you can ignore this email."
        ),
    }
}

/// Verification code SMS.
pub fn otp_sms(to: &str, code: &str, ttl_minutes: i64) -> SmsMessage {
    SmsMessage {
        to: to.to_string(),
        body: format!("Your Prepdeck code is {code}. It expires in {ttl_minutes} minutes."),
    }
}

/// Badge award notice.
pub fn badge_awarded_email(to: &str, title: &str, description: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("You earned the {title} badge!"),
        body: format!(
            "Congratulations! You just earned the {title} badge.\n\n{description}\n\n\
             Keep it up and see what you unlock next."
        ),
    }
}

/// Referral reward notice, sent when a referral completes.
pub fn referral_reward_email(to: &str, reward_days: i32, claim_window_days: i64) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "You have a Prepdeck reward waiting".to_string(),
        body: format!(
            "A referral just completed and earned you {reward_days} days of subscription time.\n\n\
             Claim your reward within {claim_window_days} days from your account page."
        ),
    }
}

/// Weekly usage snapshot for the operations inbox.
pub fn usage_report_email(to: &str, snapshot: &serde_json::Value) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Prepdeck weekly usage report".to_string(),
        body: format!(
            "Platform usage snapshot:\n\n{}",
            serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| snapshot.to_string())
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_email_contains_code() {
        let msg = otp_email("student@example.com", "482913", 10);
        assert!(msg.body.contains("482913"));
        assert!(msg.body.contains("10 minutes"));
        assert_eq!(msg.to, "student@example.com");
    }

    #[test]
    fn test_otp_sms_contains_code() {
        let msg = otp_sms("+15550001111", "482913", 10);
        assert!(msg.body.contains("482913"));
    }

    #[test]
    fn test_badge_email_mentions_title() {
        let msg = badge_awarded_email("s@example.com", "Night Owl", "Studied late at night");
        assert!(msg.subject.contains("Night Owl"));
        assert!(msg.body.contains("Studied late at night"));
    }

    #[test]
    fn test_referral_email_mentions_days() {
        let msg = referral_reward_email("s@example.com", 7, 30);
        assert!(msg.body.contains("7 days"));
        assert!(msg.body.contains("30 days"));
    }
}
