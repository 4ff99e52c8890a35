//! Read-only aggregation queries for the admin dashboard.

use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

use prepdeck_core::error::{AppError, ErrorKind};
use prepdeck_core::result::AppResult;
use prepdeck_entity::otp::OtpKind;

/// One day of a time series.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct DailyCountRow {
    /// The day bucket.
    pub day: NaiveDate,
    /// Rows counted in that bucket.
    pub count: i64,
}

/// Aggregate progress figures across all students.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct ProgressOverviewRow {
    /// Students with at least one progress row.
    pub students_tracked: i64,
    /// Mean progress across all rows.
    pub average_progress: Option<f64>,
    /// Mean quiz score across rows with attempts.
    pub average_score: Option<f64>,
    /// Total completed lessons.
    pub lessons_completed: i64,
}

/// Repository for cross-table dashboard aggregations.
#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    /// Create a new analytics repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Daily signup counts for the trailing window, oldest day first.
    /// Days with no signups are present with a zero count.
    pub async fn signup_series(&self, days: i32) -> AppResult<Vec<DailyCountRow>> {
        sqlx::query_as::<_, DailyCountRow>(
            "SELECT d::date AS day, COUNT(u.id) AS count \
             FROM generate_series( \
                 CURRENT_DATE - make_interval(days => $1::int - 1), \
                 CURRENT_DATE, '1 day') AS d \
             LEFT JOIN users u ON u.created_at::date = d::date \
             GROUP BY d ORDER BY d",
        )
        .bind(days)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to build signup series", e)
        })
    }

    /// Daily login counts (sessions created) for the trailing window.
    pub async fn login_series(&self, days: i32) -> AppResult<Vec<DailyCountRow>> {
        sqlx::query_as::<_, DailyCountRow>(
            "SELECT d::date AS day, COUNT(s.id) AS count \
             FROM generate_series( \
                 CURRENT_DATE - make_interval(days => $1::int - 1), \
                 CURRENT_DATE, '1 day') AS d \
             LEFT JOIN user_sessions s ON s.created_at::date = d::date \
             GROUP BY d ORDER BY d",
        )
        .bind(days)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to build login series", e)
        })
    }

    /// OTP issuance counts grouped by kind over the trailing window.
    pub async fn otp_volume_by_kind(&self, days: i32) -> AppResult<Vec<(OtpKind, i64)>> {
        sqlx::query_as::<_, (OtpKind, i64)>(
            "SELECT kind, COUNT(*) FROM otps \
             WHERE created_at >= NOW() - make_interval(days => $1::int) \
             GROUP BY kind ORDER BY COUNT(*) DESC",
        )
        .bind(days)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to aggregate OTP volume", e)
        })
    }

    /// Aggregate progress figures across the whole platform.
    pub async fn progress_overview(&self) -> AppResult<ProgressOverviewRow> {
        sqlx::query_as::<_, ProgressOverviewRow>(
            "SELECT COUNT(DISTINCT user_id) AS students_tracked, \
                    AVG(progress) AS average_progress, \
                    AVG(average_score) FILTER (WHERE attempts > 0) AS average_score, \
                    COUNT(*) FILTER (WHERE status = 'completed') AS lessons_completed \
             FROM lesson_progress",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to aggregate progress", e)
        })
    }
}
