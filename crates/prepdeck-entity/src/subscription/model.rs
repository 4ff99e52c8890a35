//! Subscription entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "lowercase")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    /// Currently entitles the user to paid content.
    Active,
    /// Ran past its end date.
    Expired,
    /// Cancelled before its end date.
    Cancelled,
}

impl SubscriptionStatus {
    /// Return the status as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's subscription to a plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    /// Unique subscription identifier.
    pub id: Uuid,
    /// The subscribing user.
    pub user_id: Uuid,
    /// The subscribed plan.
    pub plan_id: Uuid,
    /// Current status.
    pub status: SubscriptionStatus,
    /// When the entitlement began.
    pub starts_at: DateTime<Utc>,
    /// When the entitlement ends.
    pub ends_at: DateTime<Utc>,
    /// When the subscription was created.
    pub created_at: DateTime<Utc>,
    /// When the subscription was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Check whether the subscription entitles the user right now.
    pub fn is_current(&self) -> bool {
        self.status == SubscriptionStatus::Active && self.ends_at > Utc::now()
    }
}
