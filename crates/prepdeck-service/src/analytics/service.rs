//! Dashboard view-model assembly.
//!
//! Pulls counts and series from the repositories and shapes them for the
//! admin endpoints. The overview snapshot is cached briefly so dashboard
//! refreshes do not hammer the aggregation queries.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tracing::warn;

use prepdeck_cache::CacheManager;
use prepdeck_cache::keys;
use prepdeck_core::result::AppResult;
use prepdeck_core::traits::cache::CacheProvider;
use prepdeck_database::repositories::analytics::{DailyCountRow, ProgressOverviewRow};
use prepdeck_database::repositories::{
    AnalyticsRepository, LessonBadgeRepository, LessonProgressRepository, ReferralRepository,
    SessionRepository, SubscriptionRepository, UserRepository,
};
use prepdeck_entity::subscription::SubscriptionStatus;

use crate::context::RequestContext;

/// How long the overview snapshot stays cached.
const OVERVIEW_TTL: StdDuration = StdDuration::from_secs(60);

/// Widest signup series an admin can request.
const MAX_SERIES_DAYS: i32 = 365;

/// The admin dashboard snapshot.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DashboardOverview {
    /// Total registered users.
    pub total_users: i64,
    /// Users registered in the last 24 hours.
    pub new_users_24h: i64,
    /// User counts keyed by role.
    pub users_by_role: BTreeMap<String, i64>,
    /// Live sessions right now.
    pub active_sessions: i64,
    /// Distinct users who logged in over the last 24 hours.
    pub active_users_24h: i64,
    /// Verification codes issued in the last 24 hours.
    pub otp_issued_24h: i64,
    /// Subscription counts keyed by status.
    pub subscriptions_by_status: BTreeMap<String, i64>,
    /// Referral counts keyed by status.
    pub referral_funnel: BTreeMap<String, i64>,
    /// Badge counts keyed by type.
    pub badges_by_type: BTreeMap<String, i64>,
}

/// Lesson engagement aggregates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EngagementReport {
    /// Platform-wide progress aggregates.
    pub progress: ProgressOverviewRow,
    /// Lessons completed in the last 7 days.
    pub completions_7d: i64,
    /// Daily login series for the last 14 days.
    pub logins: Vec<DailyCountRow>,
}

/// Assembles admin dashboard view-models.
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    analytics_repo: Arc<AnalyticsRepository>,
    user_repo: Arc<UserRepository>,
    session_repo: Arc<SessionRepository>,
    subscription_repo: Arc<SubscriptionRepository>,
    referral_repo: Arc<ReferralRepository>,
    progress_repo: Arc<LessonProgressRepository>,
    badge_repo: Arc<LessonBadgeRepository>,
    cache: Arc<CacheManager>,
}

impl AnalyticsService {
    /// Creates a new analytics service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        analytics_repo: Arc<AnalyticsRepository>,
        user_repo: Arc<UserRepository>,
        session_repo: Arc<SessionRepository>,
        subscription_repo: Arc<SubscriptionRepository>,
        referral_repo: Arc<ReferralRepository>,
        progress_repo: Arc<LessonProgressRepository>,
        badge_repo: Arc<LessonBadgeRepository>,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            analytics_repo,
            user_repo,
            session_repo,
            subscription_repo,
            referral_repo,
            progress_repo,
            badge_repo,
            cache,
        }
    }

    /// Returns the dashboard overview, served from cache when fresh.
    pub async fn overview(&self, ctx: &RequestContext) -> AppResult<DashboardOverview> {
        ctx.require_admin()?;

        let key = keys::admin_dashboard();
        if let Ok(Some(cached)) = self.cache.get(&key).await
            && let Ok(snapshot) = serde_json::from_str(&cached)
        {
            return Ok(snapshot);
        }

        let snapshot = self.build_overview().await?;
        if let Ok(serialized) = serde_json::to_string(&snapshot)
            && let Err(e) = self.cache.set(&key, &serialized, OVERVIEW_TTL).await
        {
            warn!(error = %e, "Could not cache dashboard overview");
        }
        Ok(snapshot)
    }

    /// Builds the overview snapshot from live queries. Also used by the
    /// weekly usage report job, which runs without a request context.
    pub async fn build_overview(&self) -> AppResult<DashboardOverview> {
        let day_ago = Utc::now() - Duration::hours(24);

        let total_users = self.user_repo.count().await? as i64;
        let new_users_24h = self.user_repo.count_created_since(day_ago).await? as i64;
        let users_by_role = self
            .user_repo
            .count_by_role()
            .await?
            .into_iter()
            .map(|(role, n)| (role.to_string(), n))
            .collect();

        let active_sessions = self.session_repo.count_all_active().await?;
        let active_users_24h = self.session_repo.count_distinct_users_since(day_ago).await?;
        let otp_issued_24h = self
            .analytics_repo
            .otp_volume_by_kind(1)
            .await?
            .into_iter()
            .map(|(_, n)| n)
            .sum();

        let mut subscriptions_by_status = BTreeMap::new();
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Expired,
            SubscriptionStatus::Cancelled,
        ] {
            let count = self.subscription_repo.count_by_status(status).await? as i64;
            subscriptions_by_status.insert(status.to_string(), count);
        }

        let referral_funnel = self
            .referral_repo
            .count_by_status()
            .await?
            .into_iter()
            .map(|(status, n)| (status.to_string(), n))
            .collect();

        let badges_by_type = self
            .badge_repo
            .count_by_type()
            .await?
            .into_iter()
            .map(|(badge, n)| (badge.to_string(), n))
            .collect();

        Ok(DashboardOverview {
            total_users,
            new_users_24h,
            users_by_role,
            active_sessions,
            active_users_24h,
            otp_issued_24h,
            subscriptions_by_status,
            referral_funnel,
            badges_by_type,
        })
    }

    /// Returns the daily signup series for the trailing window.
    pub async fn signup_series(
        &self,
        ctx: &RequestContext,
        days: i32,
    ) -> AppResult<Vec<DailyCountRow>> {
        ctx.require_admin()?;
        let days = days.clamp(1, MAX_SERIES_DAYS);
        self.analytics_repo.signup_series(days).await
    }

    /// Returns lesson engagement aggregates.
    pub async fn engagement(&self, ctx: &RequestContext) -> AppResult<EngagementReport> {
        ctx.require_admin()?;
        let week_ago = Utc::now() - Duration::days(7);

        let progress = self.analytics_repo.progress_overview().await?;
        let completions_7d = self.progress_repo.count_completed_since(week_ago).await? as i64;
        let logins = self.analytics_repo.login_series(14).await?;

        Ok(EngagementReport {
            progress,
            completions_7d,
            logins,
        })
    }
}
