//! Session repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use prepdeck_core::error::{AppError, ErrorKind};
use prepdeck_core::result::AppResult;
use prepdeck_core::types::pagination::{PageRequest, PageResponse};
use prepdeck_entity::session::model::{CreateSession, UserSession};

/// Repository for session CRUD and query operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new session row.
    pub async fn create(&self, data: &CreateSession) -> AppResult<UserSession> {
        sqlx::query_as::<_, UserSession>(
            "INSERT INTO user_sessions (user_id, token, device_info, ip_address, user_agent, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.user_id)
        .bind(&data.token)
        .bind(&data.device_info)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    /// Find a session by its opaque token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<UserSession>> {
        sqlx::query_as::<_, UserSession>("SELECT * FROM user_sessions WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find session by token", e)
            })
    }

    /// List all live sessions for a user, newest activity first.
    pub async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<UserSession>> {
        sqlx::query_as::<_, UserSession>(
            "SELECT * FROM user_sessions \
             WHERE user_id = $1 AND is_active = TRUE AND expires_at > NOW() \
             ORDER BY last_activity_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active sessions", e)
        })
    }

    /// Update the last-activity timestamp without touching expiry.
    pub async fn touch_last_activity(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE user_sessions SET last_activity_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to touch session", e))?;
        Ok(())
    }

    /// Deactivate a single session by token. Returns whether a live row
    /// was flipped.
    pub async fn deactivate_by_token(&self, token: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_active = FALSE WHERE token = $1 AND is_active = TRUE",
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to deactivate session", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Deactivate every active session belonging to a user. Returns the
    /// number of sessions flipped.
    pub async fn deactivate_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_active = FALSE WHERE user_id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to deactivate user sessions", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Flip expired sessions to inactive. Idempotent; safe to run while
    /// live traffic validates other rows.
    pub async fn deactivate_expired(&self) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_active = FALSE \
             WHERE is_active = TRUE AND expires_at < NOW()",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to deactivate expired sessions", e)
        })?;
        Ok(result.rows_affected())
    }

    /// List live sessions system-wide with pagination, newest first.
    pub async fn list_active(&self, page: &PageRequest) -> AppResult<PageResponse<UserSession>> {
        let total = self.count_all_active().await?;

        let sessions = sqlx::query_as::<_, UserSession>(
            "SELECT * FROM user_sessions \
             WHERE is_active = TRUE AND expires_at > NOW() \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list active sessions", e)
        })?;

        Ok(PageResponse::new(
            sessions,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Count live sessions system-wide.
    pub async fn count_all_active(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM user_sessions WHERE is_active = TRUE AND expires_at > NOW()",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count active sessions", e)
        })
    }

    /// Count distinct users with a live session created since the given time.
    pub async fn count_distinct_users_since(
        &self,
        since: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT user_id) FROM user_sessions WHERE created_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count recent users", e)
        })
    }
}
