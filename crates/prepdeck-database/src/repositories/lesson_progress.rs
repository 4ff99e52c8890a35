//! Lesson progress repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use prepdeck_core::error::{AppError, ErrorKind};
use prepdeck_core::result::AppResult;
use prepdeck_entity::lesson::progress::{LessonProgress, ProgressStatus};

/// One row of the study leaderboard.
#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct LeaderboardRow {
    /// The ranked student.
    pub user_id: Uuid,
    /// Display name, when the student has set one.
    pub display_name: Option<String>,
    /// Mean completion percentage across the student's lessons.
    pub average_progress: f64,
    /// Number of lessons the student has completed.
    pub lessons_completed: i64,
    /// Total time spent in seconds across all lessons.
    pub time_spent_seconds: i64,
}

/// Repository for lesson progress rows.
#[derive(Debug, Clone)]
pub struct LessonProgressRepository {
    pool: PgPool,
}

impl LessonProgressRepository {
    /// Create a new lesson progress repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the progress row for a (user, lesson) pair.
    pub async fn find(&self, user_id: Uuid, lesson_id: Uuid) -> AppResult<Option<LessonProgress>> {
        sqlx::query_as::<_, LessonProgress>(
            "SELECT * FROM lesson_progress WHERE user_id = $1 AND lesson_id = $2",
        )
        .bind(user_id)
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find lesson progress", e)
        })
    }

    /// Create the initial progress row for a (user, lesson) pair.
    pub async fn create(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
        total_content: i32,
        total_topics: i32,
    ) -> AppResult<LessonProgress> {
        sqlx::query_as::<_, LessonProgress>(
            "INSERT INTO lesson_progress (user_id, lesson_id, total_content, total_topics) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(user_id)
        .bind(lesson_id)
        .bind(total_content)
        .bind(total_topics)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("lesson_progress_user_id_lesson_id_key") =>
            {
                AppError::conflict("Lesson progress already initialized".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create lesson progress", e),
        })
    }

    /// Persist recomputed counters for an existing progress row.
    pub async fn save(&self, progress: &LessonProgress) -> AppResult<LessonProgress> {
        sqlx::query_as::<_, LessonProgress>(
            "UPDATE lesson_progress SET \
                content_completed = $2, topics_completed = $3, attempts = $4, \
                time_spent_seconds = $5, average_score = $6, progress = $7, \
                status = $8, completed_at = $9, last_accessed_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(progress.id)
        .bind(progress.content_completed)
        .bind(progress.topics_completed)
        .bind(progress.attempts)
        .bind(progress.time_spent_seconds)
        .bind(progress.average_score)
        .bind(progress.progress)
        .bind(progress.status)
        .bind(progress.completed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to save lesson progress", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Lesson progress {} not found", progress.id)))
    }

    /// List every progress row for a user, most recently touched first.
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<LessonProgress>> {
        sqlx::query_as::<_, LessonProgress>(
            "SELECT * FROM lesson_progress WHERE user_id = $1 ORDER BY last_accessed_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list lesson progress", e)
        })
    }

    /// Rank students by completed lessons, then average progress, then time.
    pub async fn leaderboard(&self, limit: i64) -> AppResult<Vec<LeaderboardRow>> {
        sqlx::query_as::<_, LeaderboardRow>(
            "SELECT lp.user_id, u.display_name, \
                AVG(lp.progress) AS average_progress, \
                COUNT(*) FILTER (WHERE lp.status = 'completed') AS lessons_completed, \
                COALESCE(SUM(lp.time_spent_seconds), 0)::BIGINT AS time_spent_seconds \
             FROM lesson_progress lp JOIN users u ON u.id = lp.user_id \
             GROUP BY lp.user_id, u.display_name \
             ORDER BY lessons_completed DESC, average_progress DESC, time_spent_seconds ASC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to build leaderboard", e)
        })
    }

    /// Count progress rows in a given status.
    pub async fn count_by_status(&self, status: ProgressStatus) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM lesson_progress WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count progress rows", e)
                })?;
        Ok(count as u64)
    }

    /// Count lessons completed at or after the given time.
    pub async fn count_completed_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM lesson_progress WHERE completed_at >= $1")
                .bind(since)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to count completed lessons",
                        e,
                    )
                })?;
        Ok(count as u64)
    }
}
