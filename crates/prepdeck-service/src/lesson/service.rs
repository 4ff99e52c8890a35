//! Lesson progress use cases.
//!
//! Progress rows are created lazily on first access and mutated on every
//! report. Each report recomputes the composite percentage, derives the
//! status from it, and then runs a badge pass over the fresh snapshot.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use prepdeck_cache::CacheManager;
use prepdeck_cache::keys;
use prepdeck_core::error::AppError;
use prepdeck_core::result::AppResult;
use prepdeck_core::traits::cache::CacheProvider;
use prepdeck_database::repositories::lesson_progress::LeaderboardRow;
use prepdeck_database::repositories::{LessonBadgeRepository, LessonProgressRepository};
use prepdeck_entity::lesson::badge::LessonBadge;
use prepdeck_entity::lesson::progress::{LessonProgress, ProgressStatus, ProgressUpdate};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::lesson::badges::BadgeEngine;

/// How long leaderboard snapshots stay cached.
const LEADERBOARD_TTL: Duration = Duration::from_secs(60);

/// Outcome of a progress report: the updated row plus any badges the
/// report unlocked.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProgressReport {
    /// The updated progress row.
    pub progress: LessonProgress,
    /// Badges awarded by this report's badge pass.
    pub new_badges: Vec<LessonBadge>,
}

/// Handles lesson progress tracking, badges, and the study leaderboard.
#[derive(Debug, Clone)]
pub struct LessonService {
    progress_repo: Arc<LessonProgressRepository>,
    badge_repo: Arc<LessonBadgeRepository>,
    badges: BadgeEngine,
    cache: Arc<CacheManager>,
}

impl LessonService {
    /// Creates a new lesson service.
    pub fn new(
        progress_repo: Arc<LessonProgressRepository>,
        badge_repo: Arc<LessonBadgeRepository>,
        badges: BadgeEngine,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            progress_repo,
            badge_repo,
            badges,
            cache,
        }
    }

    /// Initializes progress tracking for a lesson.
    ///
    /// Idempotent: if the row already exists it is returned untouched,
    /// totals included. Totals are fixed at initialization.
    pub async fn initialize(
        &self,
        ctx: &RequestContext,
        lesson_id: Uuid,
        total_content: i32,
        total_topics: i32,
    ) -> AppResult<LessonProgress> {
        if total_content < 0 || total_topics < 0 {
            return Err(AppError::validation("Lesson totals cannot be negative"));
        }
        if let Some(existing) = self.progress_repo.find(ctx.user_id, lesson_id).await? {
            return Ok(existing);
        }
        match self
            .progress_repo
            .create(ctx.user_id, lesson_id, total_content, total_topics)
            .await
        {
            Ok(progress) => Ok(progress),
            // Concurrent initialize: the unique key absorbed ours, the
            // other row is the one to return.
            Err(e) if e.kind == prepdeck_core::error::ErrorKind::Conflict => self
                .progress_repo
                .find(ctx.user_id, lesson_id)
                .await?
                .ok_or(e),
            Err(e) => Err(e),
        }
    }

    /// Applies a progress report and runs the badge pass.
    ///
    /// Counter deltas are added, the composite percentage and status are
    /// recomputed, completion is stamped the first time progress reaches
    /// 100, and the badge catalogue is evaluated against the result.
    pub async fn record_progress(
        &self,
        ctx: &RequestContext,
        lesson_id: Uuid,
        update: &ProgressUpdate,
    ) -> AppResult<ProgressReport> {
        validate_update(update)?;

        let mut progress = self
            .progress_repo
            .find(ctx.user_id, lesson_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Lesson progress not initialized for this lesson")
            })?;

        apply_update(&mut progress, update);

        let progress = self.progress_repo.save(&progress).await?;
        debug!(
            user_id = %ctx.user_id,
            lesson_id = %lesson_id,
            progress = progress.progress,
            status = ?progress.status,
            "Progress recorded"
        );

        let new_badges = self.badges.evaluate(&progress).await?;
        if !new_badges.is_empty() {
            self.invalidate_badge_caches(ctx.user_id).await;
        }

        Ok(ProgressReport {
            progress,
            new_badges,
        })
    }

    /// Returns the progress row for one lesson.
    pub async fn progress(
        &self,
        ctx: &RequestContext,
        lesson_id: Uuid,
    ) -> AppResult<LessonProgress> {
        self.progress_repo
            .find(ctx.user_id, lesson_id)
            .await?
            .ok_or_else(|| AppError::not_found("No progress recorded for this lesson"))
    }

    /// Lists all of the current user's progress rows.
    pub async fn my_progress(&self, ctx: &RequestContext) -> AppResult<Vec<LessonProgress>> {
        self.progress_repo.list_for_user(ctx.user_id).await
    }

    /// Lists the current user's earned badges, optionally scoped to one
    /// lesson.
    pub async fn earned_badges(
        &self,
        ctx: &RequestContext,
        lesson_id: Option<Uuid>,
    ) -> AppResult<Vec<LessonBadge>> {
        match lesson_id {
            Some(lesson_id) => self.badge_repo.list_for_lesson(ctx.user_id, lesson_id).await,
            None => self.badge_repo.list_for_user(ctx.user_id).await,
        }
    }

    /// Returns the study leaderboard, served from cache when fresh.
    pub async fn leaderboard(&self, limit: i64) -> AppResult<Vec<LeaderboardRow>> {
        let key = keys::progress_leaderboard(limit);
        if let Ok(Some(cached)) = self.cache.get(&key).await
            && let Ok(rows) = serde_json::from_str(&cached)
        {
            return Ok(rows);
        }

        let rows = self.progress_repo.leaderboard(limit).await?;
        if let Ok(serialized) = serde_json::to_string(&rows)
            && let Err(e) = self.cache.set(&key, &serialized, LEADERBOARD_TTL).await
        {
            warn!(error = %e, "Could not cache leaderboard");
        }
        Ok(rows)
    }

    async fn invalidate_badge_caches(&self, user_id: Uuid) {
        for key in [keys::user_badges(user_id), keys::badge_leaderboard(10)] {
            if let Err(e) = self.cache.delete(&key).await {
                warn!(key = %key, error = %e, "Cache invalidation failed");
            }
        }
    }
}

/// Rejects reports with negative deltas or out-of-range scores.
fn validate_update(update: &ProgressUpdate) -> AppResult<()> {
    if update.content_completed < 0
        || update.topics_completed < 0
        || update.attempts < 0
        || update.time_spent_seconds < 0
    {
        return Err(AppError::validation("Progress deltas cannot be negative"));
    }
    if let Some(score) = update.score
        && !(0.0..=100.0).contains(&score)
    {
        return Err(AppError::validation("Score must be between 0 and 100"));
    }
    Ok(())
}

/// Applies counter deltas and recomputes the derived fields in place.
fn apply_update(progress: &mut LessonProgress, update: &ProgressUpdate) {
    progress.content_completed += update.content_completed;
    progress.topics_completed += update.topics_completed;
    progress.time_spent_seconds += update.time_spent_seconds;

    // Running average over attempts: new attempts fold their score into
    // the existing mean; attempts without a score still count.
    if update.attempts > 0 {
        let old_attempts = progress.attempts;
        progress.attempts += update.attempts;
        if let Some(score) = update.score {
            let total = f64::from(progress.attempts);
            progress.average_score = (progress.average_score * f64::from(old_attempts)
                + score * f64::from(update.attempts))
                / total;
        }
    }

    progress.progress = progress.compute_progress();
    progress.status = ProgressStatus::from_progress(progress.progress);
    if progress.status == ProgressStatus::Completed && progress.completed_at.is_none() {
        progress.completed_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fresh_progress() -> LessonProgress {
        LessonProgress {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            lesson_id: Uuid::new_v4(),
            total_content: 10,
            total_topics: 4,
            content_completed: 0,
            topics_completed: 0,
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
    fn deltas_accumulate_and_status_follows() {
        let mut p = fresh_progress();
        apply_update(
            &mut p,
            &ProgressUpdate {
                content_completed: 5,
                topics_completed: 2,
                time_spent_seconds: 600,
                ..Default::default()
            },
        );
        assert_eq!(p.progress, 50.0);
        assert_eq!(p.status, ProgressStatus::InProgress);
        assert!(p.completed_at.is_none());

        apply_update(
            &mut p,
            &ProgressUpdate {
                content_completed: 5,
                topics_completed: 2,
                ..Default::default()
            },
        );
        assert_eq!(p.progress, 100.0);
        assert_eq!(p.status, ProgressStatus::Completed);
        assert!(p.completed_at.is_some());
    }

    #[test]
    fn completion_stamp_is_set_once() {
        let mut p = fresh_progress();
        apply_update(
            &mut p,
            &ProgressUpdate {
                content_completed: 10,
                topics_completed: 4,
                ..Default::default()
            },
        );
        let first = p.completed_at;
        assert!(first.is_some());
        apply_update(
            &mut p,
            &ProgressUpdate {
                time_spent_seconds: 60,
                ..Default::default()
            },
        );
        assert_eq!(p.completed_at, first);
    }

    #[test]
    fn score_folds_into_running_average() {
        let mut p = fresh_progress();
        apply_update(
            &mut p,
            &ProgressUpdate {
                attempts: 1,
                score: Some(80.0),
                ..Default::default()
            },
        );
        assert_eq!(p.average_score, 80.0);
        apply_update(
            &mut p,
            &ProgressUpdate {
                attempts: 1,
                score: Some(100.0),
                ..Default::default()
            },
        );
        assert_eq!(p.average_score, 90.0);
    }

    #[test]
    fn attempts_without_score_keep_the_average() {
        let mut p = fresh_progress();
        apply_update(
            &mut p,
            &ProgressUpdate {
                attempts: 2,
                score: Some(70.0),
                ..Default::default()
            },
        );
        apply_update(
            &mut p,
            &ProgressUpdate {
                attempts: 1,
                ..Default::default()
            },
        );
        assert_eq!(p.attempts, 3);
        assert_eq!(p.average_score, 70.0);
    }

    #[test]
    fn negative_deltas_are_rejected() {
        assert!(
            validate_update(&ProgressUpdate {
                content_completed: -1,
                ..Default::default()
            })
            .is_err()
        );
        assert!(
            validate_update(&ProgressUpdate {
                score: Some(120.0),
                ..Default::default()
            })
            .is_err()
        );
        assert!(validate_update(&ProgressUpdate::default()).is_ok());
    }
}
