//! Referral reward entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Which side of the referral a reward belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reward_recipient", rename_all = "lowercase")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardRecipient {
    /// The owner of the applied code.
    Referrer,
    /// The user who applied the code.
    Referee,
}

impl RewardRecipient {
    /// Return the recipient as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Referrer => "REFERRER",
            Self::Referee => "REFEREE",
        }
    }
}

impl fmt::Display for RewardRecipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A claimable subscription-day reward issued on referral completion.
///
/// Rewards are created in pairs (one per side) and are independently
/// claimable until their expiry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReferralReward {
    /// Unique reward identifier.
    pub id: Uuid,
    /// The referral this reward came from.
    pub referral_id: Uuid,
    /// The user who may claim this reward.
    pub user_id: Uuid,
    /// Which side of the referral this reward belongs to.
    pub recipient: RewardRecipient,
    /// Subscription days granted on claim.
    pub reward_days: i32,
    /// Whether the reward has been claimed.
    pub claimed: bool,
    /// When the reward was claimed.
    pub claimed_at: Option<DateTime<Utc>>,
    /// Last moment the reward can be claimed.
    pub expires_at: DateTime<Utc>,
    /// When the reward was issued.
    pub created_at: DateTime<Utc>,
}

impl ReferralReward {
    /// Check whether the claim window has closed.
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// Check whether the reward can be claimed right now.
    pub fn is_claimable(&self) -> bool {
        !self.claimed && !self.is_expired()
    }
}
