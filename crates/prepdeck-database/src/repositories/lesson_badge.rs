//! Lesson badge repository implementation.

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use prepdeck_core::error::{AppError, ErrorKind};
use prepdeck_core::result::AppResult;
use prepdeck_entity::lesson::badge::{BadgeType, LessonBadge};

/// One row of the badge-count leaderboard.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct BadgeCountRow {
    /// The ranked student.
    pub user_id: Uuid,
    /// Display name, when the student has set one.
    pub display_name: Option<String>,
    /// Total badges earned.
    pub badge_count: i64,
}

/// Repository for lesson badge rows.
#[derive(Debug, Clone)]
pub struct LessonBadgeRepository {
    pool: PgPool,
}

impl LessonBadgeRepository {
    /// Create a new lesson badge repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a badge unless the (user, lesson, type) triplet already has
    /// one. Returns the new row, or `None` when the unique constraint
    /// absorbed a duplicate award.
    pub async fn insert_if_absent(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
        badge_type: BadgeType,
        metadata: Option<&serde_json::Value>,
    ) -> AppResult<Option<LessonBadge>> {
        sqlx::query_as::<_, LessonBadge>(
            "INSERT INTO lesson_badges (user_id, lesson_id, badge_type, title, description, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id, lesson_id, badge_type) DO NOTHING \
             RETURNING *",
        )
        .bind(user_id)
        .bind(lesson_id)
        .bind(badge_type)
        .bind(badge_type.title())
        .bind(badge_type.description())
        .bind(metadata)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert badge", e))
    }

    /// List the badge types already awarded for a (user, lesson) pair.
    pub async fn awarded_types(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> AppResult<Vec<BadgeType>> {
        sqlx::query_scalar::<_, BadgeType>(
            "SELECT badge_type FROM lesson_badges WHERE user_id = $1 AND lesson_id = $2",
        )
        .bind(user_id)
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list awarded badge types", e)
        })
    }

    /// List every badge a user has earned, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<LessonBadge>> {
        sqlx::query_as::<_, LessonBadge>(
            "SELECT * FROM lesson_badges WHERE user_id = $1 ORDER BY earned_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list badges", e))
    }

    /// List a user's badges for one lesson.
    pub async fn list_for_lesson(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> AppResult<Vec<LessonBadge>> {
        sqlx::query_as::<_, LessonBadge>(
            "SELECT * FROM lesson_badges WHERE user_id = $1 AND lesson_id = $2 \
             ORDER BY earned_at DESC",
        )
        .bind(user_id)
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list lesson badges", e)
        })
    }

    /// Rank students by total badges earned.
    pub async fn leaderboard(&self, limit: i64) -> AppResult<Vec<BadgeCountRow>> {
        sqlx::query_as::<_, BadgeCountRow>(
            "SELECT lb.user_id, u.display_name, COUNT(*) AS badge_count \
             FROM lesson_badges lb JOIN users u ON u.id = lb.user_id \
             GROUP BY lb.user_id, u.display_name \
             ORDER BY badge_count DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to build badge leaderboard", e)
        })
    }

    /// Count badges grouped by type, for analytics.
    pub async fn count_by_type(&self) -> AppResult<Vec<(BadgeType, i64)>> {
        sqlx::query_as::<_, (BadgeType, i64)>(
            "SELECT badge_type, COUNT(*) FROM lesson_badges GROUP BY badge_type \
             ORDER BY COUNT(*) DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count badges by type", e)
        })
    }
}
