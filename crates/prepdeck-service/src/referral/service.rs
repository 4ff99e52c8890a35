//! Referral program use cases.
//!
//! The referral chain is: generate a code, a new user applies it
//! (PENDING), the referee converts (COMPLETED, reward pair issued), each
//! side claims its reward inside the 30-day window. Claiming pays out as
//! subscription days: extending the active subscription, or starting a
//! trial when there is nothing to extend.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use tracing::{info, warn};

use prepdeck_core::config::ReferralConfig;
use prepdeck_core::error::AppError;
use prepdeck_core::result::AppResult;
use prepdeck_database::repositories::referral::ReferralLeaderboardRow;
use prepdeck_database::repositories::{ReferralRepository, SubscriptionRepository, UserRepository};
use prepdeck_entity::referral::reward::RewardRecipient;
use prepdeck_entity::referral::{Referral, ReferralCode, ReferralReward, ReferralStatus};
use prepdeck_entity::subscription::FREE_TRIAL_SLUG;
use prepdeck_notify::{Notifier, message};
use uuid::Uuid;

use crate::context::RequestContext;

/// Alphabet for generated codes. Uppercase letters and digits only, so
/// codes survive being read aloud or typed from a screenshot.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// How many generation attempts before giving up on a unique code.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Result envelope for a reward claim.
///
/// Rule failures (already claimed, expired, not yours) are reported in
/// the envelope rather than as errors: the client renders the message
/// and the referral state is untouched either way.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClaimOutcome {
    /// Whether the reward was paid out.
    pub success: bool,
    /// Human-readable outcome description.
    pub message: String,
    /// The reward row after the claim attempt, when it exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<ReferralReward>,
}

impl ClaimOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            reward: None,
        }
    }
}

/// Everything the referral page shows for one user.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MyReferrals {
    /// The user's shareable code, if generated.
    pub code: Option<ReferralCode>,
    /// Referrals where this user is the referrer.
    pub referrals: Vec<Referral>,
    /// The referral where this user is the referee, if any.
    pub referred_by: Option<Referral>,
    /// The user's rewards, claimed and unclaimed.
    pub rewards: Vec<ReferralReward>,
}

/// Handles referral codes, lifecycle transitions, and reward claims.
#[derive(Debug, Clone)]
pub struct ReferralService {
    referral_repo: Arc<ReferralRepository>,
    subscription_repo: Arc<SubscriptionRepository>,
    user_repo: Arc<UserRepository>,
    notifier: Arc<Notifier>,
    config: ReferralConfig,
}

impl ReferralService {
    /// Creates a new referral service.
    pub fn new(
        referral_repo: Arc<ReferralRepository>,
        subscription_repo: Arc<SubscriptionRepository>,
        user_repo: Arc<UserRepository>,
        notifier: Arc<Notifier>,
        config: ReferralConfig,
    ) -> Self {
        Self {
            referral_repo,
            subscription_repo,
            user_repo,
            notifier,
            config,
        }
    }

    /// Returns the user's referral code, generating one on first call.
    ///
    /// Codes are 1:1 per user; repeated calls return the same code.
    pub async fn generate_code(&self, ctx: &RequestContext) -> AppResult<ReferralCode> {
        if let Some(existing) = self.referral_repo.find_code_by_user(ctx.user_id).await? {
            return Ok(existing);
        }

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = random_code(self.config.code_length);
            if self.referral_repo.code_exists(&code).await? {
                continue;
            }
            match self.referral_repo.create_code(ctx.user_id, &code).await {
                Ok(created) => {
                    info!(user_id = %ctx.user_id, code = %created.code, "Referral code generated");
                    return Ok(created);
                }
                // Concurrent generate for the same user: return theirs.
                Err(e) if e.kind == prepdeck_core::error::ErrorKind::Conflict => {
                    if let Some(existing) =
                        self.referral_repo.find_code_by_user(ctx.user_id).await?
                    {
                        return Ok(existing);
                    }
                    return Err(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(AppError::internal(
            "Could not generate a unique referral code",
        ))
    }

    /// Applies a referral code on behalf of the current user.
    ///
    /// Creates a PENDING referral and bumps the code's usage counter.
    pub async fn apply_code(&self, ctx: &RequestContext, code: &str) -> AppResult<Referral> {
        let code = code.trim().to_uppercase();
        let code_row = self
            .referral_repo
            .find_code(&code)
            .await?
            .ok_or_else(|| AppError::not_found("Referral code not found"))?;

        if !code_row.is_usable() {
            return Err(AppError::validation("This referral code can no longer be used"));
        }
        if code_row.user_id == ctx.user_id {
            return Err(AppError::validation("You cannot apply your own referral code"));
        }
        if self
            .referral_repo
            .find_by_referee(ctx.user_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("You have already applied a referral code"));
        }

        let referral = self
            .referral_repo
            .create_referral(code_row.user_id, ctx.user_id, code_row.id)
            .await?;
        self.referral_repo.increment_code_usage(code_row.id).await?;

        info!(
            referrer_id = %code_row.user_id,
            referee_id = %ctx.user_id,
            "Referral code applied"
        );
        Ok(referral)
    }

    /// Completes the referral where the given user is the referee.
    ///
    /// Flips PENDING to COMPLETED and issues the reward pair, each with
    /// its own claim window starting now. Idempotent at the status flip:
    /// an already-completed referral issues nothing twice.
    pub async fn complete_referral(&self, referee_id: Uuid) -> AppResult<Referral> {
        let referral = self
            .referral_repo
            .find_by_referee(referee_id)
            .await?
            .ok_or_else(|| AppError::not_found("No referral found for this user"))?;

        let Some(completed) = self.referral_repo.complete_referral(referral.id).await? else {
            return Err(AppError::conflict("Referral is already completed"));
        };

        let expires_at = Utc::now() + Duration::days(self.config.reward_expiry_days);
        let referrer_reward = self
            .referral_repo
            .create_reward(
                completed.id,
                completed.referrer_id,
                RewardRecipient::Referrer,
                self.config.referrer_reward_days as i32,
                expires_at,
            )
            .await?;
        let referee_reward = self
            .referral_repo
            .create_reward(
                completed.id,
                completed.referee_id,
                RewardRecipient::Referee,
                self.config.referred_reward_days as i32,
                expires_at,
            )
            .await?;

        info!(
            referral_id = %completed.id,
            referrer_id = %completed.referrer_id,
            referee_id = %completed.referee_id,
            "Referral completed, rewards issued"
        );

        self.notify_reward(&referrer_reward).await;
        self.notify_reward(&referee_reward).await;

        Ok(completed)
    }

    /// Claims a reward and pays it out as subscription days.
    ///
    /// Rule failures come back as `{success: false}` envelopes; only
    /// infrastructure problems surface as errors.
    pub async fn claim_reward(
        &self,
        ctx: &RequestContext,
        reward_id: Uuid,
    ) -> AppResult<ClaimOutcome> {
        let Some(reward) = self.referral_repo.find_reward(reward_id).await? else {
            return Ok(ClaimOutcome::failure("Reward not found"));
        };
        if reward.user_id != ctx.user_id {
            return Ok(ClaimOutcome::failure("This reward belongs to another account"));
        }
        if reward.claimed {
            return Ok(ClaimOutcome::failure("Reward has already been claimed"));
        }
        if reward.is_expired() {
            return Ok(ClaimOutcome::failure("The claim window for this reward has closed"));
        }

        // Guarded flip: of two concurrent claims only one sees a row here.
        let Some(claimed) = self.referral_repo.mark_reward_claimed(reward.id).await? else {
            return Ok(ClaimOutcome::failure("Reward has already been claimed"));
        };

        self.credit_subscription_days(ctx.user_id, i64::from(claimed.reward_days))
            .await?;

        info!(
            user_id = %ctx.user_id,
            reward_id = %claimed.id,
            days = claimed.reward_days,
            "Referral reward claimed"
        );
        Ok(ClaimOutcome {
            success: true,
            message: format!("{} subscription days added", claimed.reward_days),
            reward: Some(claimed),
        })
    }

    /// Returns the current user's referral page data.
    pub async fn my_referrals(&self, ctx: &RequestContext) -> AppResult<MyReferrals> {
        let code = self.referral_repo.find_code_by_user(ctx.user_id).await?;
        let referrals = self.referral_repo.list_by_referrer(ctx.user_id).await?;
        let referred_by = self.referral_repo.find_by_referee(ctx.user_id).await?;
        let rewards = self.referral_repo.list_rewards_for_user(ctx.user_id).await?;
        Ok(MyReferrals {
            code,
            referrals,
            referred_by,
            rewards,
        })
    }

    /// Returns the referrer leaderboard.
    pub async fn leaderboard(&self, limit: i64) -> AppResult<Vec<ReferralLeaderboardRow>> {
        self.referral_repo.leaderboard(limit).await
    }

    /// Counts referrals per status, for the admin funnel view.
    pub async fn funnel(&self) -> AppResult<Vec<(ReferralStatus, i64)>> {
        self.referral_repo.count_by_status().await
    }

    /// Adds days to the active subscription, or starts a free trial
    /// extended by the reward when there is no subscription to extend.
    async fn credit_subscription_days(&self, user_id: Uuid, days: i64) -> AppResult<()> {
        if let Some(active) = self.subscription_repo.find_active_by_user(user_id).await? {
            self.subscription_repo.extend(active.id, days).await?;
            return Ok(());
        }

        let plan = self
            .subscription_repo
            .find_plan_by_slug(FREE_TRIAL_SLUG)
            .await?
            .ok_or_else(|| AppError::internal("The free trial plan is not configured"))?;
        self.subscription_repo
            .create(user_id, plan.id, i64::from(plan.duration_days) + days)
            .await?;
        Ok(())
    }

    /// Best-effort reward notice. The reward row is already committed.
    async fn notify_reward(&self, reward: &ReferralReward) {
        let email = match self.user_repo.find_by_id(reward.user_id).await {
            Ok(Some(user)) => user.email,
            Ok(None) => None,
            Err(e) => {
                warn!(user_id = %reward.user_id, error = %e, "Could not load user for reward email");
                None
            }
        };
        let Some(email) = email else { return };

        let message = message::referral_reward_email(
            &email,
            reward.reward_days,
            self.config.reward_expiry_days,
        );
        if let Err(e) = self.notifier.send_email(&message).await {
            warn!(user_id = %reward.user_id, error = %e, "Reward email delivery failed");
        }
    }
}

/// Generates a random code from the uppercase-alphanumeric alphabet.
fn random_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_uppercase_alphanumeric() {
        for _ in 0..100 {
            let code = random_code(8);
            assert_eq!(code.len(), 8);
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            );
        }
    }

    #[test]
    fn codes_vary() {
        let a = random_code(8);
        let b = random_code(8);
        // Vanishingly unlikely to collide over a 36^8 space.
        assert_ne!(a, b);
    }

    #[test]
    fn claim_failure_envelope_has_no_reward() {
        let outcome = ClaimOutcome::failure("Reward not found");
        assert!(!outcome.success);
        assert!(outcome.reward.is_none());
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("reward").is_none());
    }
}
