//! Lesson badge entities and the fixed award catalogue.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::progress::LessonProgress;

/// Seconds-per-content-item threshold for the speed badge.
const SPEED_THRESHOLD_SECONDS: f64 = 300.0;

/// The fixed catalogue of badge types.
///
/// The catalogue is closed: each variant carries its own award predicate
/// evaluated against the current progress snapshot. Evaluation order is
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "badge_type", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BadgeType {
    /// Lesson completed.
    Completion,
    /// Completed with under five minutes per content item.
    SpeedDemon,
    /// Perfect average quiz score.
    PerfectScore,
    /// Completed after five or more quiz attempts.
    Perseverance,
    /// Started studying between 05:00 and 08:59.
    EarlyBird,
    /// Completed late at night (22:00 onward or before 03:00).
    NightOwl,
    /// Completed lessons on consecutive days.
    ///
    /// TODO: the predicate only checks completion today; wiring in an
    /// actual consecutive-day check needs a per-user completion-date
    /// history that the progress row does not carry yet.
    StreakMaster,
    /// Average quiz score of 90 or above.
    TopPerformer,
    /// Every content item in the lesson completed.
    ContentExplorer,
    /// Average quiz score of 85 or above with at least one attempt.
    QuizMaster,
}

impl BadgeType {
    /// All badge types in award-evaluation order.
    pub const ALL: [BadgeType; 10] = [
        Self::Completion,
        Self::SpeedDemon,
        Self::PerfectScore,
        Self::Perseverance,
        Self::EarlyBird,
        Self::NightOwl,
        Self::StreakMaster,
        Self::TopPerformer,
        Self::ContentExplorer,
        Self::QuizMaster,
    ];

    /// Evaluate this badge's award condition against a progress snapshot.
    pub fn is_satisfied_by(&self, progress: &LessonProgress) -> bool {
        match self {
            Self::Completion => progress.is_completed(),
            Self::SpeedDemon => {
                progress.is_completed()
                    && progress
                        .seconds_per_content_item()
                        .is_some_and(|s| s < SPEED_THRESHOLD_SECONDS)
            }
            Self::PerfectScore => progress.average_score >= 100.0 && progress.attempts > 0,
            Self::Perseverance => progress.is_completed() && progress.attempts >= 5,
            Self::EarlyBird => {
                let hour = progress.started_at.hour();
                (5..=8).contains(&hour)
            }
            Self::NightOwl => progress.completed_at.is_some_and(|at| {
                let hour = at.hour();
                hour >= 22 || hour <= 2
            }),
            Self::StreakMaster => progress.is_completed(),
            Self::TopPerformer => progress.average_score >= 90.0,
            Self::ContentExplorer => {
                progress.total_content > 0
                    && progress.content_completed == progress.total_content
            }
            Self::QuizMaster => progress.average_score >= 85.0 && progress.attempts > 0,
        }
    }

    /// Human-readable badge title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Completion => "Lesson Complete",
            Self::SpeedDemon => "Speed Demon",
            Self::PerfectScore => "Perfect Score",
            Self::Perseverance => "Perseverance",
            Self::EarlyBird => "Early Bird",
            Self::NightOwl => "Night Owl",
            Self::StreakMaster => "Streak Master",
            Self::TopPerformer => "Top Performer",
            Self::ContentExplorer => "Content Explorer",
            Self::QuizMaster => "Quiz Master",
        }
    }

    /// Human-readable badge description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Completion => "Completed every part of the lesson",
            Self::SpeedDemon => "Finished the lesson in record time",
            Self::PerfectScore => "Scored 100% on lesson quizzes",
            Self::Perseverance => "Kept going through five or more attempts",
            Self::EarlyBird => "Started studying in the early morning",
            Self::NightOwl => "Finished the lesson late at night",
            Self::StreakMaster => "Completed lessons on a streak",
            Self::TopPerformer => "Averaged 90% or better on quizzes",
            Self::ContentExplorer => "Viewed every content item in the lesson",
            Self::QuizMaster => "Averaged 85% or better across quiz attempts",
        }
    }

    /// Return the badge type as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completion => "COMPLETION",
            Self::SpeedDemon => "SPEED_DEMON",
            Self::PerfectScore => "PERFECT_SCORE",
            Self::Perseverance => "PERSEVERANCE",
            Self::EarlyBird => "EARLY_BIRD",
            Self::NightOwl => "NIGHT_OWL",
            Self::StreakMaster => "STREAK_MASTER",
            Self::TopPerformer => "TOP_PERFORMER",
            Self::ContentExplorer => "CONTENT_EXPLORER",
            Self::QuizMaster => "QUIZ_MASTER",
        }
    }
}

impl std::fmt::Display for BadgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A badge earned by a student on a lesson.
///
/// Unique on `(user_id, lesson_id, badge_type)`. Never mutated or
/// revoked after insertion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonBadge {
    /// Unique badge row identifier.
    pub id: Uuid,
    /// The student who earned the badge.
    pub user_id: Uuid,
    /// The lesson the badge was earned on.
    pub lesson_id: Uuid,
    /// Which badge was earned.
    pub badge_type: BadgeType,
    /// Display title at award time.
    pub title: String,
    /// Display description at award time.
    pub description: String,
    /// Snapshot of the progress values that satisfied the predicate.
    pub metadata: Option<serde_json::Value>,
    /// When the badge was awarded.
    pub earned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::progress::ProgressStatus;
    use chrono::TimeZone;

    fn completed_progress() -> LessonProgress {
        LessonProgress {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            lesson_id: Uuid::new_v4(),
            total_content: 10,
            total_topics: 4,
            content_completed: 10,
            topics_completed: 4,
            attempts: 2,
            time_spent_seconds: 1200,
            average_score: 80.0,
            progress: 100.0,
            status: ProgressStatus::Completed,
            started_at: Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap(),
            completed_at: Some(Utc.with_ymd_and_hms(2026, 3, 2, 15, 0, 0).unwrap()),
            last_accessed_at: Utc::now(),
        }
    }

    #[test]
    fn completion_requires_completed_status() {
        let mut p = completed_progress();
        assert!(BadgeType::Completion.is_satisfied_by(&p));
        p.status = ProgressStatus::InProgress;
        assert!(!BadgeType::Completion.is_satisfied_by(&p));
    }

    #[test]
    fn speed_demon_uses_time_per_content_item() {
        let mut p = completed_progress();
        // 1200s over 10 items = 120s each.
        assert!(BadgeType::SpeedDemon.is_satisfied_by(&p));
        p.time_spent_seconds = 4000;
        assert!(!BadgeType::SpeedDemon.is_satisfied_by(&p));
    }

    #[test]
    fn perfect_score_needs_attempts() {
        let mut p = completed_progress();
        p.average_score = 100.0;
        assert!(BadgeType::PerfectScore.is_satisfied_by(&p));
        p.attempts = 0;
        assert!(!BadgeType::PerfectScore.is_satisfied_by(&p));
    }

    #[test]
    fn early_bird_window_is_five_to_eight() {
        let mut p = completed_progress();
        p.started_at = Utc.with_ymd_and_hms(2026, 3, 2, 5, 0, 0).unwrap();
        assert!(BadgeType::EarlyBird.is_satisfied_by(&p));
        p.started_at = Utc.with_ymd_and_hms(2026, 3, 2, 8, 59, 0).unwrap();
        assert!(BadgeType::EarlyBird.is_satisfied_by(&p));
        p.started_at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        assert!(!BadgeType::EarlyBird.is_satisfied_by(&p));
        p.started_at = Utc.with_ymd_and_hms(2026, 3, 2, 4, 59, 0).unwrap();
        assert!(!BadgeType::EarlyBird.is_satisfied_by(&p));
    }

    #[test]
    fn night_owl_wraps_midnight() {
        let mut p = completed_progress();
        p.completed_at = Some(Utc.with_ymd_and_hms(2026, 3, 2, 23, 30, 0).unwrap());
        assert!(BadgeType::NightOwl.is_satisfied_by(&p));
        p.completed_at = Some(Utc.with_ymd_and_hms(2026, 3, 2, 1, 15, 0).unwrap());
        assert!(BadgeType::NightOwl.is_satisfied_by(&p));
        p.completed_at = Some(Utc.with_ymd_and_hms(2026, 3, 2, 3, 0, 0).unwrap());
        assert!(!BadgeType::NightOwl.is_satisfied_by(&p));
        p.completed_at = None;
        assert!(!BadgeType::NightOwl.is_satisfied_by(&p));
    }

    #[test]
    fn content_explorer_requires_nonzero_total() {
        let mut p = completed_progress();
        assert!(BadgeType::ContentExplorer.is_satisfied_by(&p));
        p.total_content = 0;
        p.content_completed = 0;
        assert!(!BadgeType::ContentExplorer.is_satisfied_by(&p));
    }

    #[test]
    fn score_badges_thresholds() {
        let mut p = completed_progress();
        p.average_score = 90.0;
        assert!(BadgeType::TopPerformer.is_satisfied_by(&p));
        assert!(BadgeType::QuizMaster.is_satisfied_by(&p));
        p.average_score = 85.0;
        assert!(!BadgeType::TopPerformer.is_satisfied_by(&p));
        assert!(BadgeType::QuizMaster.is_satisfied_by(&p));
        p.average_score = 84.9;
        assert!(!BadgeType::QuizMaster.is_satisfied_by(&p));
    }

    #[test]
    fn catalogue_has_ten_distinct_entries() {
        let mut seen = std::collections::HashSet::new();
        for badge in BadgeType::ALL {
            assert!(seen.insert(badge.as_str()));
        }
        assert_eq!(seen.len(), 10);
    }
}
