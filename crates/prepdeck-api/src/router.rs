//! Route definitions for the Prepdeck HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(student_routes())
        .merge(referral_routes())
        .merge(subscription_routes())
        .merge(exam_routes())
        .merge(admin_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Registration, login, OTP issuance, and session endpoints.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route(
            "/auth/start-registration",
            post(handlers::auth::start_registration),
        )
        .route(
            "/auth/complete-registration",
            post(handlers::auth::complete_registration),
        )
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/verify-email", post(handlers::auth::verify_email))
        .route("/auth/send-email-otp", post(handlers::auth::send_email_otp))
        .route("/auth/send-phone-otp", post(handlers::auth::send_phone_otp))
        .route("/auth/send-login-otp", post(handlers::auth::send_login_otp))
        .route("/auth/oauth/google", post(handlers::auth::google_oauth))
        .route(
            "/auth/otp-usage-stats",
            get(handlers::auth::otp_usage_stats),
        )
        .route("/auth/logout", post(handlers::auth::logout))
        .route(
            "/auth/logout-all-devices",
            post(handlers::auth::logout_all),
        )
        .route("/auth/sessions", get(handlers::auth::sessions))
}

/// User self-service endpoints.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::user::me))
        .route("/users/me", put(handlers::user::update_me))
        .route("/users/me/password", put(handlers::user::change_password))
        .route(
            "/users/me/email-change/request",
            post(handlers::user::request_email_change),
        )
        .route(
            "/users/me/email-change/confirm",
            post(handlers::user::confirm_email_change),
        )
        .route(
            "/users/me/phone-change/request",
            post(handlers::user::request_phone_change),
        )
        .route(
            "/users/me/phone-change/confirm",
            post(handlers::user::confirm_phone_change),
        )
}

/// Lesson progress, badges, and the study leaderboard.
fn student_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/student/lesson-progress/{lesson_id}/initialize",
            post(handlers::student::initialize_progress),
        )
        .route(
            "/student/lesson-progress/{lesson_id}/update",
            post(handlers::student::update_progress),
        )
        .route(
            "/student/lesson-progress",
            get(handlers::student::my_progress),
        )
        .route(
            "/student/lesson-progress/{lesson_id}",
            get(handlers::student::lesson_progress),
        )
        .route(
            "/student/badges/earned",
            get(handlers::student::earned_badges),
        )
        .route("/student/leaderboard", get(handlers::student::leaderboard))
}

/// Referral codes, claims, and the referral leaderboard.
fn referral_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/referrals/generate-code",
            post(handlers::referral::generate_code),
        )
        .route("/referrals/apply-code", post(handlers::referral::apply_code))
        .route("/referrals/me", get(handlers::referral::my_referrals))
        .route(
            "/referrals/claim-reward/{reward_id}",
            post(handlers::referral::claim_reward),
        )
        .route(
            "/referrals/leaderboard",
            get(handlers::referral::leaderboard),
        )
}

/// Subscription and plan catalogue endpoints.
fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions/me",
            get(handlers::subscription::my_subscription),
        )
        .route("/plans", get(handlers::subscription::plans))
}

/// Published exam content endpoints.
fn exam_routes() -> Router<AppState> {
    Router::new()
        .route("/exams", get(handlers::exam::list_exams))
        .route("/exams/{id}", get(handlers::exam::get_exam))
}

/// Admin endpoints: analytics, users, referrals, exams, sessions.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/analytics/overview",
            get(handlers::admin::analytics::overview),
        )
        .route(
            "/admin/analytics/signups",
            get(handlers::admin::analytics::signups),
        )
        .route(
            "/admin/analytics/engagement",
            get(handlers::admin::analytics::engagement),
        )
        .route("/admin/users", get(handlers::admin::users::list_users))
        .route("/admin/users/{id}", get(handlers::admin::users::get_user))
        .route(
            "/admin/users/{id}/status",
            put(handlers::admin::users::update_status),
        )
        .route(
            "/admin/users/{id}/role",
            put(handlers::admin::users::update_role),
        )
        .route(
            "/admin/referrals/{referee_id}/complete",
            post(handlers::admin::referrals::complete_referral),
        )
        .route("/admin/exams", get(handlers::admin::exams::list_papers))
        .route("/admin/exams", post(handlers::admin::exams::create_paper))
        .route(
            "/admin/exams/{id}",
            put(handlers::admin::exams::set_published),
        )
        .route(
            "/admin/exams/{id}",
            delete(handlers::admin::exams::delete_paper),
        )
        .route(
            "/admin/exams/{id}/questions",
            post(handlers::admin::exams::add_question),
        )
        .route(
            "/admin/questions/{id}",
            delete(handlers::admin::exams::delete_question),
        )
        .route(
            "/admin/sessions",
            get(handlers::admin::sessions::list_sessions),
        )
        .route(
            "/admin/sessions/cleanup",
            post(handlers::admin::sessions::cleanup),
        )
        .route(
            "/admin/sessions/users/{id}",
            delete(handlers::admin::sessions::end_user_sessions),
        )
}

/// Liveness endpoint, public.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
