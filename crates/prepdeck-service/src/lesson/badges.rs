//! Badge evaluation and awarding.
//!
//! A badge pass runs after every progress report: each catalogue entry is
//! evaluated in declaration order against the fresh progress snapshot,
//! and every newly satisfied predicate becomes an insert. The composite
//! unique key on (user, lesson, type) absorbs concurrent duplicate
//! awards, so the pass itself needs no locking.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use prepdeck_core::result::AppResult;
use prepdeck_database::repositories::{LessonBadgeRepository, UserRepository};
use prepdeck_entity::lesson::badge::{BadgeType, LessonBadge};
use prepdeck_entity::lesson::progress::LessonProgress;
use prepdeck_notify::{Notifier, message};

/// Evaluates the badge catalogue and persists new awards.
#[derive(Debug, Clone)]
pub struct BadgeEngine {
    badge_repo: Arc<LessonBadgeRepository>,
    user_repo: Arc<UserRepository>,
    notifier: Arc<Notifier>,
}

impl BadgeEngine {
    /// Create a new badge engine.
    pub fn new(
        badge_repo: Arc<LessonBadgeRepository>,
        user_repo: Arc<UserRepository>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            badge_repo,
            user_repo,
            notifier,
        }
    }

    /// Run one award pass over a fresh progress snapshot.
    ///
    /// Returns the badges awarded by this pass. Awards are monotonic:
    /// types already held are skipped, and a predicate that stops holding
    /// later never revokes anything.
    pub async fn evaluate(&self, progress: &LessonProgress) -> AppResult<Vec<LessonBadge>> {
        let held: HashSet<BadgeType> = self
            .badge_repo
            .awarded_types(progress.user_id, progress.lesson_id)
            .await?
            .into_iter()
            .collect();

        let snapshot = award_metadata(progress);
        let mut awarded = Vec::new();
        for badge_type in BadgeType::ALL {
            if held.contains(&badge_type) || !badge_type.is_satisfied_by(progress) {
                continue;
            }
            // None means another pass won the race; either way the badge
            // exists, so just move on.
            if let Some(badge) = self
                .badge_repo
                .insert_if_absent(
                    progress.user_id,
                    progress.lesson_id,
                    badge_type,
                    Some(&snapshot),
                )
                .await?
            {
                info!(
                    user_id = %progress.user_id,
                    lesson_id = %progress.lesson_id,
                    badge = %badge_type,
                    "Badge awarded"
                );
                self.congratulate(progress.user_id, &badge).await;
                awarded.push(badge);
            }
        }
        Ok(awarded)
    }

    /// Best-effort congratulation email. Delivery problems are logged and
    /// swallowed; the badge row is already committed.
    async fn congratulate(&self, user_id: uuid::Uuid, badge: &LessonBadge) {
        let email = match self.user_repo.find_by_id(user_id).await {
            Ok(Some(user)) => user.email,
            Ok(None) => None,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Could not load user for badge email");
                None
            }
        };
        let Some(email) = email else { return };

        let message = message::badge_awarded_email(&email, &badge.title, &badge.description);
        if let Err(e) = self.notifier.send_email(&message).await {
            warn!(user_id = %user_id, error = %e, "Badge email delivery failed");
        }
    }
}

/// Snapshot of the progress values the predicates saw, stored on the
/// badge row for support queries.
fn award_metadata(progress: &LessonProgress) -> serde_json::Value {
    serde_json::json!({
        "progress": progress.progress,
        "average_score": progress.average_score,
        "attempts": progress.attempts,
        "time_spent_seconds": progress.time_spent_seconds,
        "content_completed": progress.content_completed,
        "topics_completed": progress.topics_completed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use prepdeck_entity::lesson::progress::ProgressStatus;
    use uuid::Uuid;

    fn completed_snapshot() -> LessonProgress {
        LessonProgress {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            lesson_id: Uuid::new_v4(),
            total_content: 10,
            total_topics: 4,
            content_completed: 10,
            topics_completed: 4,
            attempts: 6,
            time_spent_seconds: 1200,
            average_score: 100.0,
            progress: 100.0,
            status: ProgressStatus::Completed,
            started_at: Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap(),
            completed_at: Some(Utc.with_ymd_and_hms(2026, 3, 2, 23, 0, 0).unwrap()),
            last_accessed_at: Utc::now(),
        }
    }

    #[test]
    fn catalogue_order_is_declaration_order() {
        let snapshot = completed_snapshot();
        let satisfied: Vec<BadgeType> = BadgeType::ALL
            .into_iter()
            .filter(|b| b.is_satisfied_by(&snapshot))
            .collect();
        // Everything fires for this snapshot, in declaration order.
        assert_eq!(satisfied, BadgeType::ALL.to_vec());
    }

    #[test]
    fn streak_master_currently_mirrors_completion() {
        // Known deviation: the predicate checks completion, not an actual
        // consecutive-day streak. Keep this pinned until the completion
        // history needed for the real check exists.
        let mut snapshot = completed_snapshot();
        assert_eq!(
            BadgeType::StreakMaster.is_satisfied_by(&snapshot),
            BadgeType::Completion.is_satisfied_by(&snapshot)
        );
        snapshot.status = ProgressStatus::InProgress;
        assert_eq!(
            BadgeType::StreakMaster.is_satisfied_by(&snapshot),
            BadgeType::Completion.is_satisfied_by(&snapshot)
        );
    }

    #[test]
    fn metadata_snapshot_carries_predicate_inputs() {
        let snapshot = completed_snapshot();
        let metadata = award_metadata(&snapshot);
        assert_eq!(metadata["attempts"], 6);
        assert_eq!(metadata["average_score"], 100.0);
    }
}
