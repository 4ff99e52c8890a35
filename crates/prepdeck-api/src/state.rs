//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use prepdeck_auth::{JwtDecoder, SessionManager};
use prepdeck_cache::CacheManager;
use prepdeck_core::config::AppConfig;

use prepdeck_service::{
    AdminUserService, AnalyticsService, AuthService, ExamService, LessonService, ReferralService,
    SessionAdminService, SubscriptionService, UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,
    /// Cache manager (Redis or in-memory)
    pub cache: Arc<CacheManager>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Session lifecycle manager
    pub session_manager: Arc<SessionManager>,

    // ── Services ─────────────────────────────────────────────
    /// Registration, login, verification flows
    pub auth_service: Arc<AuthService>,
    /// User self-service
    pub user_service: Arc<UserService>,
    /// Admin user management
    pub admin_user_service: Arc<AdminUserService>,
    /// Lesson progress and badges
    pub lesson_service: Arc<LessonService>,
    /// Referral engine
    pub referral_service: Arc<ReferralService>,
    /// Subscriptions and plans
    pub subscription_service: Arc<SubscriptionService>,
    /// Exam content
    pub exam_service: Arc<ExamService>,
    /// Admin dashboard aggregations
    pub analytics_service: Arc<AnalyticsService>,
    /// Admin session oversight
    pub session_admin_service: Arc<SessionAdminService>,
}
