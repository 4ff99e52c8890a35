//! One-time password entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::OtpKind;

/// Owner prefix marking a code issued to a phone number with no account.
pub const ANON_OWNER_PREFIX: &str = "anon_";

/// A one-time password issued to a user or an unregistered phone number.
///
/// Rows are never deleted on consumption; `consumed` is flipped instead
/// so issuance history remains available to the rate limiter.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Otp {
    /// Unique code identifier.
    pub id: Uuid,
    /// Owning user ID as a string, or `anon_<phone>` for pre-registration
    /// flows where no account exists yet.
    pub owner: String,
    /// The numeric code itself.
    pub code: String,
    /// Purpose and delivery route.
    pub kind: OtpKind,
    /// Destination address or phone number the code was sent to.
    pub target: String,
    /// Whether the code has been used to verify.
    pub consumed: bool,
    /// When the code stops being valid.
    pub expires_at: DateTime<Utc>,
    /// When the code was issued.
    pub created_at: DateTime<Utc>,
}

impl Otp {
    /// Check whether the code is past its validity window.
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// Build the synthetic owner string for an unregistered phone number.
    pub fn anonymous_owner(phone: &str) -> String {
        format!("{ANON_OWNER_PREFIX}{phone}")
    }

    /// Check whether an owner string denotes an unregistered phone number.
    pub fn is_anonymous_owner(owner: &str) -> bool {
        owner.starts_with(ANON_OWNER_PREFIX)
    }
}

/// Data required to store a newly issued code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOtp {
    /// Owner string (user ID or `anon_<phone>`).
    pub owner: String,
    /// The generated code.
    pub code: String,
    /// Purpose and delivery route.
    pub kind: OtpKind,
    /// Destination the code is being sent to.
    pub target: String,
    /// When the code stops being valid.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_owner_round_trip() {
        let owner = Otp::anonymous_owner("+15551234567");
        assert_eq!(owner, "anon_+15551234567");
        assert!(Otp::is_anonymous_owner(&owner));
        assert!(!Otp::is_anonymous_owner("8f14e45f-ceea-4a7b-9c3d-000000000000"));
    }
}
