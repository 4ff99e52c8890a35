//! Lesson progress entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Weight of content completion in the composite percentage.
const CONTENT_WEIGHT: f64 = 60.0;
/// Weight of topic completion in the composite percentage.
const TOPIC_WEIGHT: f64 = 40.0;

/// Completion state of a lesson, derived from the progress percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "progress_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressStatus {
    /// No content or topics completed yet.
    NotStarted,
    /// Some progress recorded.
    InProgress,
    /// Progress has reached 100.
    Completed,
}

impl ProgressStatus {
    /// Derive the status from a progress percentage.
    pub fn from_progress(progress: f64) -> Self {
        if progress >= 100.0 {
            Self::Completed
        } else if progress > 0.0 {
            Self::InProgress
        } else {
            Self::NotStarted
        }
    }
}

/// Per-user, per-lesson progress counters.
///
/// Created lazily on first access and mutated on every progress report.
/// Unique on `(user_id, lesson_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonProgress {
    /// Unique row identifier.
    pub id: Uuid,
    /// The student this progress belongs to.
    pub user_id: Uuid,
    /// The lesson being tracked.
    pub lesson_id: Uuid,
    /// Total content items in the lesson.
    pub total_content: i32,
    /// Total topics in the lesson.
    pub total_topics: i32,
    /// Content items completed so far.
    pub content_completed: i32,
    /// Topics completed so far.
    pub topics_completed: i32,
    /// Quiz attempts recorded.
    pub attempts: i32,
    /// Total time spent in seconds.
    pub time_spent_seconds: i64,
    /// Average quiz score (0-100).
    pub average_score: f64,
    /// Composite completion percentage (0-100).
    pub progress: f64,
    /// Completion state derived from `progress`.
    pub status: ProgressStatus,
    /// When the student first touched the lesson.
    pub started_at: DateTime<Utc>,
    /// When `progress` first reached 100.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the student last reported progress.
    pub last_accessed_at: DateTime<Utc>,
}

impl LessonProgress {
    /// Recompute the composite percentage from the stored counters.
    ///
    /// Content completion carries 60% of the weight and topic completion
    /// 40%. A zero total contributes nothing to its term. The result is
    /// capped at 100.
    pub fn compute_progress(&self) -> f64 {
        let content_ratio = if self.total_content > 0 {
            f64::from(self.content_completed) / f64::from(self.total_content)
        } else {
            0.0
        };
        let topic_ratio = if self.total_topics > 0 {
            f64::from(self.topics_completed) / f64::from(self.total_topics)
        } else {
            0.0
        };
        (CONTENT_WEIGHT * content_ratio + TOPIC_WEIGHT * topic_ratio).min(100.0)
    }

    /// Check whether the lesson has been completed.
    pub fn is_completed(&self) -> bool {
        self.status == ProgressStatus::Completed
    }

    /// Average seconds spent per completed content item.
    ///
    /// Returns `None` when no content has been completed yet.
    pub fn seconds_per_content_item(&self) -> Option<f64> {
        if self.content_completed > 0 {
            Some(self.time_spent_seconds as f64 / f64::from(self.content_completed))
        } else {
            None
        }
    }
}

/// Counter deltas reported by the client on a progress update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Newly completed content items.
    #[serde(default)]
    pub content_completed: i32,
    /// Newly completed topics.
    #[serde(default)]
    pub topics_completed: i32,
    /// Quiz attempts made in this report.
    #[serde(default)]
    pub attempts: i32,
    /// Seconds spent since the last report.
    #[serde(default)]
    pub time_spent_seconds: i64,
    /// Score achieved in this report's quiz attempts, if any.
    pub score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress_with(
        content_completed: i32,
        total_content: i32,
        topics_completed: i32,
        total_topics: i32,
    ) -> LessonProgress {
        LessonProgress {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            lesson_id: Uuid::new_v4(),
            total_content,
            total_topics,
            content_completed,
            topics_completed,
            attempts: 0,
            time_spent_seconds: 0,
            average_score: 0.0,
            progress: 0.0,
            status: ProgressStatus::NotStarted,
            started_at: Utc::now(),
            completed_at: None,
            last_accessed_at: Utc::now(),
        }
    }

    #[test]
    fn weights_split_sixty_forty() {
        let p = progress_with(10, 10, 0, 4);
        assert_eq!(p.compute_progress(), 60.0);
        let p = progress_with(0, 10, 4, 4);
        assert_eq!(p.compute_progress(), 40.0);
        let p = progress_with(5, 10, 2, 4);
        assert_eq!(p.compute_progress(), 50.0);
    }

    #[test]
    fn progress_is_capped_at_one_hundred() {
        let p = progress_with(20, 10, 8, 4);
        assert_eq!(p.compute_progress(), 100.0);
    }

    #[test]
    fn zero_totals_contribute_nothing() {
        let p = progress_with(3, 0, 2, 4);
        assert_eq!(p.compute_progress(), 20.0);
        let p = progress_with(0, 0, 0, 0);
        assert_eq!(p.compute_progress(), 0.0);
    }

    #[test]
    fn status_derivation() {
        assert_eq!(ProgressStatus::from_progress(0.0), ProgressStatus::NotStarted);
        assert_eq!(ProgressStatus::from_progress(0.1), ProgressStatus::InProgress);
        assert_eq!(ProgressStatus::from_progress(99.9), ProgressStatus::InProgress);
        assert_eq!(ProgressStatus::from_progress(100.0), ProgressStatus::Completed);
    }
}
