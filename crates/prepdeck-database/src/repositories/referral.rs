//! Referral repository implementation.
//!
//! Covers the three closely coupled referral tables: codes, referrer
//! links, and claimable rewards.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use prepdeck_core::error::{AppError, ErrorKind};
use prepdeck_core::result::AppResult;
use prepdeck_entity::referral::model::ReferralStatus;
use prepdeck_entity::referral::reward::RewardRecipient;
use prepdeck_entity::referral::{Referral, ReferralCode, ReferralReward};

/// One row of the referrer leaderboard.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct ReferralLeaderboardRow {
    /// The ranked referrer.
    pub user_id: Uuid,
    /// Display name, when set.
    pub display_name: Option<String>,
    /// Referrals in any status.
    pub total_referrals: i64,
    /// Referrals that converted.
    pub completed_referrals: i64,
}

/// Repository for referral codes, referrals, and rewards.
#[derive(Debug, Clone)]
pub struct ReferralRepository {
    pool: PgPool,
}

impl ReferralRepository {
    /// Create a new referral repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // -- Codes --

    /// Find a user's referral code.
    pub async fn find_code_by_user(&self, user_id: Uuid) -> AppResult<Option<ReferralCode>> {
        sqlx::query_as::<_, ReferralCode>("SELECT * FROM referral_codes WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find referral code", e)
            })
    }

    /// Find a referral code by its code string.
    pub async fn find_code(&self, code: &str) -> AppResult<Option<ReferralCode>> {
        sqlx::query_as::<_, ReferralCode>("SELECT * FROM referral_codes WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to look up referral code", e)
            })
    }

    /// Check whether a code string is already taken.
    pub async fn code_exists(&self, code: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM referral_codes WHERE code = $1")
            .bind(code)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check referral code", e)
            })?;
        Ok(count > 0)
    }

    /// Store a newly generated code for a user.
    pub async fn create_code(&self, user_id: Uuid, code: &str) -> AppResult<ReferralCode> {
        sqlx::query_as::<_, ReferralCode>(
            "INSERT INTO referral_codes (user_id, code) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("referral_codes_user_id_key") =>
            {
                AppError::conflict("User already has a referral code".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create referral code", e),
        })
    }

    /// Bump a code's usage counter.
    pub async fn increment_code_usage(&self, code_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE referral_codes SET usage_count = usage_count + 1 WHERE id = $1")
            .bind(code_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to increment code usage", e)
            })?;
        Ok(())
    }

    // -- Referrals --

    /// Find the referral row where the given user is the referee.
    pub async fn find_by_referee(&self, referee_id: Uuid) -> AppResult<Option<Referral>> {
        sqlx::query_as::<_, Referral>("SELECT * FROM referrals WHERE referee_id = $1")
            .bind(referee_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find referral", e)
            })
    }

    /// Insert a pending referral link.
    pub async fn create_referral(
        &self,
        referrer_id: Uuid,
        referee_id: Uuid,
        code_id: Uuid,
    ) -> AppResult<Referral> {
        sqlx::query_as::<_, Referral>(
            "INSERT INTO referrals (referrer_id, referee_id, code_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(referrer_id)
        .bind(referee_id)
        .bind(code_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("referrals_referee_id_key") =>
            {
                AppError::conflict("User has already been referred".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create referral", e),
        })
    }

    /// Flip a pending referral to completed. Returns `None` when the
    /// referral was already completed.
    pub async fn complete_referral(&self, referral_id: Uuid) -> AppResult<Option<Referral>> {
        sqlx::query_as::<_, Referral>(
            "UPDATE referrals SET status = 'completed', completed_at = NOW() \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(referral_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to complete referral", e)
        })
    }

    /// List referrals where the given user is the referrer, newest first.
    pub async fn list_by_referrer(&self, referrer_id: Uuid) -> AppResult<Vec<Referral>> {
        sqlx::query_as::<_, Referral>(
            "SELECT * FROM referrals WHERE referrer_id = $1 ORDER BY created_at DESC",
        )
        .bind(referrer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list referrals", e))
    }

    /// Count referrals grouped by status, for analytics.
    pub async fn count_by_status(&self) -> AppResult<Vec<(ReferralStatus, i64)>> {
        sqlx::query_as::<_, (ReferralStatus, i64)>(
            "SELECT status, COUNT(*) FROM referrals GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count referrals", e)
        })
    }

    /// Rank referrers by completed referral count.
    pub async fn leaderboard(&self, limit: i64) -> AppResult<Vec<ReferralLeaderboardRow>> {
        sqlx::query_as::<_, ReferralLeaderboardRow>(
            "SELECT r.referrer_id AS user_id, u.display_name, \
                    COUNT(*) AS total_referrals, \
                    COUNT(*) FILTER (WHERE r.status = 'completed') AS completed_referrals \
             FROM referrals r JOIN users u ON u.id = r.referrer_id \
             GROUP BY r.referrer_id, u.display_name \
             ORDER BY completed_referrals DESC, total_referrals DESC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to build referral leaderboard",
                e,
            )
        })
    }

    // -- Rewards --

    /// Insert a claimable reward for one side of a referral.
    pub async fn create_reward(
        &self,
        referral_id: Uuid,
        user_id: Uuid,
        recipient: RewardRecipient,
        reward_days: i32,
        expires_at: DateTime<Utc>,
    ) -> AppResult<ReferralReward> {
        sqlx::query_as::<_, ReferralReward>(
            "INSERT INTO referral_rewards (referral_id, user_id, recipient, reward_days, expires_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(referral_id)
        .bind(user_id)
        .bind(recipient)
        .bind(reward_days)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create reward", e))
    }

    /// Find a reward by ID.
    pub async fn find_reward(&self, id: Uuid) -> AppResult<Option<ReferralReward>> {
        sqlx::query_as::<_, ReferralReward>("SELECT * FROM referral_rewards WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find reward", e))
    }

    /// List a user's rewards, newest first.
    pub async fn list_rewards_for_user(&self, user_id: Uuid) -> AppResult<Vec<ReferralReward>> {
        sqlx::query_as::<_, ReferralReward>(
            "SELECT * FROM referral_rewards WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list rewards", e))
    }

    /// Mark a reward claimed. Returns `None` when the reward was already
    /// claimed (the flip is guarded so two concurrent claims cannot both
    /// succeed).
    pub async fn mark_reward_claimed(&self, id: Uuid) -> AppResult<Option<ReferralReward>> {
        sqlx::query_as::<_, ReferralReward>(
            "UPDATE referral_rewards SET claimed = TRUE, claimed_at = NOW() \
             WHERE id = $1 AND claimed = FALSE RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim reward", e))
    }

    /// Count unclaimed rewards whose claim window closed in the interval.
    pub async fn count_expired_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM referral_rewards \
             WHERE claimed = FALSE AND expires_at >= $1 AND expires_at < $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count expired rewards", e)
        })?;
        Ok(count as u64)
    }
}
