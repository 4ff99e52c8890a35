//! One-time password configuration.

use serde::{Deserialize, Serialize};

/// One-time password configuration.
///
/// Each delivery channel carries its own issuance limits. Anonymous
/// phone verification (pre-registration) is throttled harder than
/// verification for known accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Code validity window in minutes.
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: u64,
    /// Number of digits in a generated code.
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    /// Limits for email delivery to registered accounts.
    #[serde(default = "default_email_limits")]
    pub email: OtpChannelLimits,
    /// Limits for SMS delivery to registered accounts.
    #[serde(default = "default_phone_limits")]
    pub phone: OtpChannelLimits,
    /// Limits for SMS delivery to unregistered phone numbers.
    #[serde(default = "default_anonymous_limits")]
    pub anonymous: OtpChannelLimits,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl_minutes(),
            code_length: default_code_length(),
            email: default_email_limits(),
            phone: default_phone_limits(),
            anonymous: default_anonymous_limits(),
        }
    }
}

/// Issuance limits for a single OTP delivery channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OtpChannelLimits {
    /// Maximum codes issued per rolling hour.
    pub max_per_hour: i64,
    /// Maximum codes issued per rolling 24 hours.
    pub max_per_day: i64,
    /// Minimum minutes between consecutive requests.
    pub cooldown_minutes: i64,
}

fn default_ttl_minutes() -> u64 {
    10
}

fn default_code_length() -> usize {
    6
}

fn default_email_limits() -> OtpChannelLimits {
    OtpChannelLimits {
        max_per_hour: 5,
        max_per_day: 20,
        cooldown_minutes: 1,
    }
}

fn default_phone_limits() -> OtpChannelLimits {
    OtpChannelLimits {
        max_per_hour: 3,
        max_per_day: 10,
        cooldown_minutes: 2,
    }
}

fn default_anonymous_limits() -> OtpChannelLimits {
    OtpChannelLimits {
        max_per_hour: 2,
        max_per_day: 5,
        cooldown_minutes: 5,
    }
}
