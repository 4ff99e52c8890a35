//! One-time password kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The purpose and delivery route of a one-time password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "otp_kind", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpKind {
    /// Email address verification or email login.
    Email,
    /// Phone number verification or phone login.
    Phone,
    /// Confirming a change to a new email address.
    EmailChange,
    /// Confirming a change to a new phone number.
    PhoneChange,
}

impl OtpKind {
    /// Return the delivery channel for this kind.
    pub fn channel(&self) -> OtpChannel {
        match self {
            Self::Email | Self::EmailChange => OtpChannel::Email,
            Self::Phone | Self::PhoneChange => OtpChannel::Phone,
        }
    }

    /// Return the kind as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::EmailChange => "EMAIL_CHANGE",
            Self::PhoneChange => "PHONE_CHANGE",
        }
    }
}

impl fmt::Display for OtpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OtpKind {
    type Err = prepdeck_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EMAIL" => Ok(Self::Email),
            "PHONE" => Ok(Self::Phone),
            "EMAIL_CHANGE" => Ok(Self::EmailChange),
            "PHONE_CHANGE" => Ok(Self::PhoneChange),
            _ => Err(prepdeck_core::AppError::validation(format!(
                "Invalid OTP kind: '{s}'. Expected one of: EMAIL, PHONE, EMAIL_CHANGE, PHONE_CHANGE"
            ))),
        }
    }
}

/// The transport used to deliver a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpChannel {
    /// Delivered to an email address.
    Email,
    /// Delivered to a phone number via SMS.
    Phone,
}

impl fmt::Display for OtpChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Phone => write!(f, "phone"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_kinds_share_the_base_channel() {
        assert_eq!(OtpKind::Email.channel(), OtpChannel::Email);
        assert_eq!(OtpKind::EmailChange.channel(), OtpChannel::Email);
        assert_eq!(OtpKind::Phone.channel(), OtpChannel::Phone);
        assert_eq!(OtpKind::PhoneChange.channel(), OtpChannel::Phone);
    }

    #[test]
    fn parses_screaming_snake_case() {
        assert_eq!(
            "EMAIL_CHANGE".parse::<OtpKind>().unwrap(),
            OtpKind::EmailChange
        );
        assert!("SMOKE_SIGNAL".parse::<OtpKind>().is_err());
    }
}
