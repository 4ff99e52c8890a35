//! Subscription plan entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Slug of the built-in trial plan used for referral rewards when the
/// claimant has no subscription to extend.
pub const FREE_TRIAL_SLUG: &str = "free-trial";

/// A purchasable (or granted) subscription plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Plan {
    /// Unique plan identifier.
    pub id: Uuid,
    /// URL-safe unique plan name.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Subscription length in days.
    pub duration_days: i32,
    /// Price in the smallest currency unit. Zero for granted plans.
    pub price_cents: i64,
    /// Whether this is a trial plan.
    pub is_trial: bool,
    /// Whether the plan can currently be subscribed to.
    pub is_active: bool,
    /// When the plan was created.
    pub created_at: DateTime<Utc>,
}
