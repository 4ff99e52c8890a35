//! One-time password repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use prepdeck_core::error::{AppError, ErrorKind};
use prepdeck_core::result::AppResult;
use prepdeck_entity::otp::model::CreateOtp;
use prepdeck_entity::otp::{Otp, OtpKind};

/// Repository for one-time password storage and issuance counters.
#[derive(Debug, Clone)]
pub struct OtpRepository {
    pool: PgPool,
}

impl OtpRepository {
    /// Create a new OTP repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a newly issued code.
    pub async fn create(&self, data: &CreateOtp) -> AppResult<Otp> {
        sqlx::query_as::<_, Otp>(
            "INSERT INTO otps (owner, code, kind, target, expires_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.owner)
        .bind(&data.code)
        .bind(data.kind)
        .bind(&data.target)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store OTP", e))
    }

    /// Find the newest unconsumed code matching the owner, code, and kind.
    ///
    /// Verification always matches against the most recently created row,
    /// so older outstanding codes lose to a newer one without being
    /// touched in the database.
    pub async fn find_newest_unconsumed(
        &self,
        owner: &str,
        code: &str,
        kind: OtpKind,
    ) -> AppResult<Option<Otp>> {
        sqlx::query_as::<_, Otp>(
            "SELECT * FROM otps \
             WHERE owner = $1 AND code = $2 AND kind = $3 AND consumed = FALSE \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(owner)
        .bind(code)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up OTP", e))
    }

    /// Find the single most recent code for an owner and kind,
    /// consumed or not. Used for the cooldown check.
    pub async fn find_latest(&self, owner: &str, kind: OtpKind) -> AppResult<Option<Otp>> {
        sqlx::query_as::<_, Otp>(
            "SELECT * FROM otps WHERE owner = $1 AND kind = $2 \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(owner)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find latest OTP", e))
    }

    /// Count codes issued to an owner for a kind at or after the given time.
    pub async fn count_created_since(
        &self,
        owner: &str,
        kind: OtpKind,
        since: DateTime<Utc>,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM otps WHERE owner = $1 AND kind = $2 AND created_at >= $3",
        )
        .bind(owner)
        .bind(kind)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count OTPs", e))
    }

    /// Flip a code to consumed.
    pub async fn mark_consumed(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE otps SET consumed = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to mark OTP consumed", e)
            })?;
        Ok(())
    }

    /// Delete codes created before the cutoff.
    ///
    /// The cutoff must trail the longest rate-limit window so issuance
    /// counters are unaffected.
    pub async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM otps WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to purge OTPs", e))?;
        Ok(result.rows_affected())
    }

    /// Count all codes issued at or after the given time, across owners.
    pub async fn count_issued_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM otps WHERE created_at >= $1")
                .bind(since)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count issued OTPs", e)
                })?;
        Ok(count as u64)
    }
}
