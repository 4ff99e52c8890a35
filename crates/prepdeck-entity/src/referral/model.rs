//! Referral entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Status of a referral link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "referral_status", rename_all = "lowercase")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferralStatus {
    /// The referee signed up with the code but has not converted yet.
    Pending,
    /// The referee converted; rewards have been issued.
    Completed,
}

impl ReferralStatus {
    /// Return the status as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A referrer-to-referee link.
///
/// Unique on `referee_id`: a user can be referred at most once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Referral {
    /// Unique referral identifier.
    pub id: Uuid,
    /// The user whose code was applied.
    pub referrer_id: Uuid,
    /// The user who applied the code.
    pub referee_id: Uuid,
    /// The code row that was applied.
    pub code_id: Uuid,
    /// Current status.
    pub status: ReferralStatus,
    /// When the code was applied.
    pub created_at: DateTime<Utc>,
    /// When the referral transitioned to completed.
    pub completed_at: Option<DateTime<Utc>>,
}
