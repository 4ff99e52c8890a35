//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use prepdeck_auth::{
    GoogleOAuth, JwtDecoder, JwtEncoder, OtpEngine, PasswordHasher, PasswordValidator,
    SessionManager,
};
use prepdeck_cache::CacheManager;
use prepdeck_core::config::AppConfig;
use prepdeck_database::repositories::{
    AnalyticsRepository, ExamRepository, LessonBadgeRepository, LessonProgressRepository,
    OtpRepository, ReferralRepository, SessionRepository, SubscriptionRepository, UserRepository,
};
use prepdeck_entity::user::UserRole;
use prepdeck_notify::Notifier;
use prepdeck_service::lesson::BadgeEngine;
use prepdeck_service::{
    AdminUserService, AnalyticsService, AuthService, ExamService, LessonService, ReferralService,
    SessionAdminService, SubscriptionService, UserService,
};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Application config
    pub config: AppConfig,
}

/// Response captured from a test request
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::load("test").expect("Failed to load test config");
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database.url = url;
    }
    config.cache.provider = "memory".to_string();
    config.notify.email.provider = "log".to_string();
    config.notify.sms.provider = "log".to_string();
    config.worker.enabled = false;
    config
}

impl TestApp {
    /// Create a test application backed by a live database.
    ///
    /// Runs migrations and wipes all rows so every test starts clean.
    pub async fn connect() -> Self {
        let config = test_config();

        let db_pool = prepdeck_database::connection::DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database")
            .into_pool();

        prepdeck_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        Self::clean_database(&db_pool).await;

        Self::from_parts(config, db_pool).await
    }

    /// Create a test application without touching the database.
    ///
    /// The pool is lazy, so routes that never reach a repository work
    /// normally and ones that do fail with a connection error.
    pub async fn offline() -> Self {
        let mut config = test_config();
        // Port 1 is never a Postgres, so DB-touching routes fail fast
        config.database.url = "postgres://127.0.0.1:1/unreachable".to_string();

        let db_pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .expect("Failed to build lazy pool");

        Self::from_parts(config, db_pool).await
    }

    async fn from_parts(config: AppConfig, db_pool: PgPool) -> Self {
        let cache = Arc::new(
            CacheManager::new(&config.cache)
                .await
                .expect("Failed to init cache"),
        );
        let notifier = Arc::new(Notifier::new(&config.notify).expect("Failed to init notifier"));

        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let otp_repo = Arc::new(OtpRepository::new(db_pool.clone()));
        let session_repo = Arc::new(SessionRepository::new(db_pool.clone()));
        let progress_repo = Arc::new(LessonProgressRepository::new(db_pool.clone()));
        let badge_repo = Arc::new(LessonBadgeRepository::new(db_pool.clone()));
        let referral_repo = Arc::new(ReferralRepository::new(db_pool.clone()));
        let subscription_repo = Arc::new(SubscriptionRepository::new(db_pool.clone()));
        let exam_repo = Arc::new(ExamRepository::new(db_pool.clone()));
        let analytics_repo = Arc::new(AnalyticsRepository::new(db_pool.clone()));

        let password_hasher = Arc::new(PasswordHasher::new());
        let password_validator = Arc::new(PasswordValidator::new(&config.auth));
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let session_manager = Arc::new(SessionManager::new(
            config.session.clone(),
            Arc::clone(&session_repo),
        ));
        let otp_engine = Arc::new(OtpEngine::new(
            &config.otp,
            Arc::clone(&otp_repo),
            Arc::clone(&notifier),
        ));
        let google = Arc::new(
            GoogleOAuth::new(config.oauth.google.clone(), cache.as_ref().clone())
                .expect("Failed to init oauth client"),
        );

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&user_repo),
            Arc::clone(&otp_engine),
            Arc::clone(&session_manager),
            Arc::clone(&jwt_encoder),
            Arc::clone(&password_hasher),
            Arc::clone(&password_validator),
            Arc::clone(&google),
        ));
        let user_service = Arc::new(UserService::new(
            Arc::clone(&user_repo),
            Arc::clone(&otp_engine),
            Arc::clone(&password_hasher),
            Arc::clone(&password_validator),
        ));
        let admin_user_service = Arc::new(AdminUserService::new(Arc::clone(&user_repo)));
        let badge_engine = BadgeEngine::new(
            Arc::clone(&badge_repo),
            Arc::clone(&user_repo),
            Arc::clone(&notifier),
        );
        let lesson_service = Arc::new(LessonService::new(
            Arc::clone(&progress_repo),
            Arc::clone(&badge_repo),
            badge_engine,
            Arc::clone(&cache),
        ));
        let referral_service = Arc::new(ReferralService::new(
            Arc::clone(&referral_repo),
            Arc::clone(&subscription_repo),
            Arc::clone(&user_repo),
            Arc::clone(&notifier),
            config.referral.clone(),
        ));
        let subscription_service =
            Arc::new(SubscriptionService::new(Arc::clone(&subscription_repo)));
        let exam_service = Arc::new(ExamService::new(Arc::clone(&exam_repo)));
        let analytics_service = Arc::new(AnalyticsService::new(
            Arc::clone(&analytics_repo),
            Arc::clone(&user_repo),
            Arc::clone(&session_repo),
            Arc::clone(&subscription_repo),
            Arc::clone(&referral_repo),
            Arc::clone(&progress_repo),
            Arc::clone(&badge_repo),
            Arc::clone(&cache),
        ));
        let session_admin_service = Arc::new(SessionAdminService::new(
            Arc::clone(&session_repo),
            Arc::clone(&session_manager),
        ));

        let state = prepdeck_api::AppState {
            config: Arc::new(config.clone()),
            db_pool: db_pool.clone(),
            cache,
            jwt_decoder,
            session_manager,
            auth_service,
            user_service,
            admin_user_service,
            lesson_service,
            referral_service,
            subscription_service,
            exam_service,
            analytics_service,
            session_admin_service,
        };

        let router = prepdeck_api::build_app(state);

        Self {
            router,
            db_pool,
            config,
        }
    }

    /// Clean all test data from the database
    async fn clean_database(pool: &PgPool) {
        let tables = [
            "jobs",
            "questions",
            "exam_papers",
            "subscriptions",
            "referral_rewards",
            "referrals",
            "referral_codes",
            "lesson_badges",
            "lesson_progress",
            "user_sessions",
            "otps",
            "users",
        ];

        for table in &tables {
            let query = format!("DELETE FROM {table}");
            let _ = sqlx::query(&query).execute(pool).await;
        }
    }

    /// Create a verified, active user directly in the database
    pub async fn create_test_user(&self, email: &str, password: &str, role: UserRole) -> Uuid {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password(password).expect("Failed to hash");
        let id = Uuid::new_v4();
        let role_str = match role {
            UserRole::Student => "student",
            UserRole::Instructor => "instructor",
            UserRole::Admin => "admin",
        };

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, display_name, role, status, email_verified) \
             VALUES ($1, $2, $3, $4, $5::user_role, 'active'::user_status, TRUE)",
        )
        .bind(id)
        .bind(email)
        .bind(&hash)
        .bind(email.split('@').next().unwrap_or(email))
        .bind(role_str)
        .execute(&self.db_pool)
        .await
        .expect("Failed to create test user");

        id
    }

    /// Fetch the most recent unconsumed OTP code sent to a target
    pub async fn latest_otp(&self, target: &str) -> String {
        sqlx::query_scalar::<_, String>(
            "SELECT code FROM otps WHERE target = $1 AND consumed = FALSE \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(target)
        .fetch_one(&self.db_pool)
        .await
        .expect("No OTP found for target")
    }

    /// Login and return a bearer token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json");

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = builder
            .body(match body {
                Some(b) => Body::from(serde_json::to_vec(&b).expect("serialize body")),
                None => Body::empty(),
            })
            .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
