//! Reward expiry sweep job handler.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use tracing;

use prepdeck_database::repositories::{ReferralRepository, SubscriptionRepository};
use prepdeck_entity::job::model::Job;

use crate::executor::{JobExecutionError, JobHandler};

/// Handles the daily reward expiry sweep.
///
/// Rewards expire passively (claims check `expires_at`), so this job only
/// tallies what lapsed in the last day for observability. It also flips
/// subscriptions that ran past their end date to expired.
#[derive(Debug)]
pub struct RewardExpiryHandler {
    /// Referral repository
    referral_repo: Arc<ReferralRepository>,
    /// Subscription repository
    subscription_repo: Arc<SubscriptionRepository>,
}

impl RewardExpiryHandler {
    /// Create a new reward expiry handler
    pub fn new(
        referral_repo: Arc<ReferralRepository>,
        subscription_repo: Arc<SubscriptionRepository>,
    ) -> Self {
        Self {
            referral_repo,
            subscription_repo,
        }
    }
}

#[async_trait]
impl JobHandler for RewardExpiryHandler {
    fn job_type(&self) -> &str {
        "reward_expiry"
    }

    async fn execute(&self, _job: &Job) -> Result<Option<Value>, JobExecutionError> {
        tracing::info!("Running reward expiry sweep");

        let now = Utc::now();
        let day_ago = now - Duration::days(1);

        let lapsed = self
            .referral_repo
            .count_expired_between(day_ago, now)
            .await
            .map_err(|e| {
                JobExecutionError::Transient(format!("Failed to count lapsed rewards: {}", e))
            })?;

        let subscriptions_expired =
            self.subscription_repo.expire_overdue().await.map_err(|e| {
                JobExecutionError::Transient(format!("Failed to expire subscriptions: {}", e))
            })?;

        tracing::info!(
            "Reward sweep done: {} rewards lapsed in the last day, {} subscriptions expired",
            lapsed,
            subscriptions_expired
        );

        Ok(Some(serde_json::json!({
            "task": "reward_expiry",
            "rewards_lapsed_24h": lapsed,
            "subscriptions_expired": subscriptions_expired,
        })))
    }
}
