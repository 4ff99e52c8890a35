//! Application builder. Wires repositories, services, worker, and the
//! router into a running Axum server.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tokio::sync::watch;

use prepdeck_auth::{
    GoogleOAuth, JwtDecoder, JwtEncoder, OtpEngine, PasswordHasher, PasswordValidator,
    SessionManager,
};
use prepdeck_cache::CacheManager;
use prepdeck_core::config::AppConfig;
use prepdeck_core::error::AppError;
use prepdeck_database::repositories::{
    AnalyticsRepository, ExamRepository, JobRepository, LessonBadgeRepository,
    LessonProgressRepository, OtpRepository, ReferralRepository, SessionRepository,
    SubscriptionRepository, UserRepository,
};
use prepdeck_notify::Notifier;
use prepdeck_service::lesson::BadgeEngine;
use prepdeck_service::{
    AdminUserService, AnalyticsService, AuthService, ExamService, LessonService, ReferralService,
    SessionAdminService, SubscriptionService, UserService,
};
use prepdeck_worker::jobs::{
    OtpPurgeHandler, RewardExpiryHandler, SessionCleanupHandler, UsageReportHandler,
};
use prepdeck_worker::{CronScheduler, WorkerRunner};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the Prepdeck server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    tracing::info!("Starting Prepdeck server...");

    // ── Step 1: Initialize cache ─────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache");
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    // ── Step 2: Initialize notification delivery ─────────────────
    let notifier = Arc::new(Notifier::new(&config.notify)?);

    // ── Step 3: Initialize repositories ──────────────────────────
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let otp_repo = Arc::new(OtpRepository::new(db_pool.clone()));
    let session_repo = Arc::new(SessionRepository::new(db_pool.clone()));
    let progress_repo = Arc::new(LessonProgressRepository::new(db_pool.clone()));
    let badge_repo = Arc::new(LessonBadgeRepository::new(db_pool.clone()));
    let referral_repo = Arc::new(ReferralRepository::new(db_pool.clone()));
    let subscription_repo = Arc::new(SubscriptionRepository::new(db_pool.clone()));
    let exam_repo = Arc::new(ExamRepository::new(db_pool.clone()));
    let analytics_repo = Arc::new(AnalyticsRepository::new(db_pool.clone()));
    let job_repo = Arc::new(JobRepository::new(db_pool.clone()));

    // ── Step 4: Initialize auth system ───────────────────────────
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
    let google = Arc::new(GoogleOAuth::new(
        config.oauth.google.clone(),
        cache.as_ref().clone(),
    )?);

    // ── Step 5: Initialize services ──────────────────────────────
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
    let subscription_service = Arc::new(SubscriptionService::new(Arc::clone(&subscription_repo)));
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

    // ── Step 6: Shutdown channel & worker ────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = if config.worker.enabled {
        let worker_id = format!("worker-{}", &uuid::Uuid::new_v4().to_string()[..8]);
        let job_queue = Arc::new(prepdeck_worker::queue::JobQueue::new(
            Arc::clone(&job_repo),
            worker_id.clone(),
        ));

        let mut job_executor = prepdeck_worker::executor::JobExecutor::new();
        job_executor.register(Arc::new(SessionCleanupHandler::new(Arc::clone(
            &session_manager,
        ))));
        job_executor.register(Arc::new(OtpPurgeHandler::new(Arc::clone(&otp_repo))));
        job_executor.register(Arc::new(RewardExpiryHandler::new(
            Arc::clone(&referral_repo),
            Arc::clone(&subscription_repo),
        )));
        job_executor.register(Arc::new(UsageReportHandler::new(
            Arc::clone(&analytics_service),
            Arc::clone(&notifier),
            config.worker.report_email.clone(),
        )));
        let job_executor = Arc::new(job_executor);

        let worker_runner = WorkerRunner::new(
            Arc::clone(&job_queue),
            job_executor,
            config.worker.clone(),
            worker_id,
        );
        let worker_cancel = shutdown_rx.clone();
        tokio::spawn(async move {
            worker_runner.run(worker_cancel).await;
        });

        let scheduler = CronScheduler::new(Arc::clone(&job_queue)).await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        None
    };

    // ── Step 7: Build and start HTTP server ──────────────────────
    let app_state = AppState {
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

    let app = build_app(app_state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Prepdeck server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(mut scheduler) = scheduler {
        scheduler.shutdown().await?;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Could not install Ctrl+C handler");
    }
}
