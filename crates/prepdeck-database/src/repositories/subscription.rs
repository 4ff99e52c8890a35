//! Subscription and plan repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use prepdeck_core::error::{AppError, ErrorKind};
use prepdeck_core::result::AppResult;
use prepdeck_entity::subscription::plan::Plan;
use prepdeck_entity::subscription::{Subscription, SubscriptionStatus};

/// Repository for subscriptions and the plans they reference.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a plan by its slug.
    pub async fn find_plan_by_slug(&self, slug: &str) -> AppResult<Option<Plan>> {
        sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find plan", e))
    }

    /// List plans students can subscribe to.
    pub async fn list_active_plans(&self) -> AppResult<Vec<Plan>> {
        sqlx::query_as::<_, Plan>(
            "SELECT * FROM plans WHERE is_active = TRUE ORDER BY price_cents ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list plans", e))
    }

    /// Find the user's current active subscription, if any.
    pub async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions \
             WHERE user_id = $1 AND status = 'active' AND ends_at > NOW() \
             ORDER BY ends_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active subscription", e)
        })
    }

    /// Check whether the user has ever held a subscription.
    pub async fn exists_for_user(&self, user_id: Uuid) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check subscriptions", e)
            })?;
        Ok(count > 0)
    }

    /// Create a subscription running from now for the given number of days.
    pub async fn create(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        duration_days: i64,
    ) -> AppResult<Subscription> {
        sqlx::query_as::<_, Subscription>(
            "INSERT INTO subscriptions (user_id, plan_id, starts_at, ends_at) \
             VALUES ($1, $2, NOW(), NOW() + make_interval(days => $3::int)) RETURNING *",
        )
        .bind(user_id)
        .bind(plan_id)
        .bind(duration_days as i32)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create subscription", e)
        })
    }

    /// Push a subscription's end date out by the given number of days.
    pub async fn extend(&self, subscription_id: Uuid, days: i64) -> AppResult<Subscription> {
        sqlx::query_as::<_, Subscription>(
            "UPDATE subscriptions \
             SET ends_at = ends_at + make_interval(days => $2::int), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(subscription_id)
        .bind(days as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to extend subscription", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Subscription {subscription_id} not found")))
    }

    /// List a user's subscriptions, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list subscriptions", e)
        })
    }

    /// Flip subscriptions past their end date to expired. Returns the
    /// number of rows flipped.
    pub async fn expire_overdue(&self) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE subscriptions SET status = 'expired', updated_at = NOW() \
             WHERE status = 'active' AND ends_at < NOW()",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to expire subscriptions", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Count subscriptions in a given status.
    pub async fn count_by_status(&self, status: SubscriptionStatus) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count subscriptions", e)
            })?;
        Ok(count as u64)
    }

    /// Count subscriptions created at or after the given time.
    pub async fn count_created_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE created_at >= $1")
                .bind(since)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to count recent subscriptions",
                        e,
                    )
                })?;
        Ok(count as u64)
    }
}
