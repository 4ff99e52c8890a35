//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use prepdeck_core::error::AppError;

use crate::queue::{JobCreateParams, JobQueue};

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Job queue for enqueuing scheduled work
    queue: Arc<JobQueue>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(queue: Arc<JobQueue>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler, queue })
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_session_cleanup().await?;
        self.register_reward_expiry().await?;
        self.register_otp_purge().await?;
        self.register_usage_report().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Session cleanup — every hour
    async fn register_session_cleanup(&self) -> Result<(), AppError> {
        let queue = Arc::clone(&self.queue);
        let job = CronJob::new_async("0 0 * * * *", move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            Box::pin(async move {
                tracing::debug!("Scheduling session cleanup job");
                let params = JobCreateParams {
                    job_type: "session_cleanup".to_string(),
                    payload: serde_json::json!({"task": "session_cleanup"}),
                    max_attempts: 1,
                    scheduled_at: None,
                };
                if let Err(e) = queue.enqueue(params).await {
                    tracing::error!("Failed to enqueue session_cleanup: {}", e);
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create session_cleanup schedule: {}", e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add session_cleanup schedule: {}", e))
        })?;

        tracing::info!("Registered: session_cleanup (hourly)");
        Ok(())
    }

    /// Reward expiry sweep — every day at 2 AM
    async fn register_reward_expiry(&self) -> Result<(), AppError> {
        let queue = Arc::clone(&self.queue);
        let job = CronJob::new_async("0 0 2 * * *", move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            Box::pin(async move {
                tracing::debug!("Scheduling reward expiry job");
                let params = JobCreateParams {
                    job_type: "reward_expiry".to_string(),
                    payload: serde_json::json!({"task": "reward_expiry"}),
                    max_attempts: 1,
                    scheduled_at: None,
                };
                if let Err(e) = queue.enqueue(params).await {
                    tracing::error!("Failed to enqueue reward_expiry: {}", e);
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create reward_expiry schedule: {}", e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add reward_expiry schedule: {}", e))
        })?;

        tracing::info!("Registered: reward_expiry (daily at 2AM)");
        Ok(())
    }

    /// Verification code purge — every day at 3 AM
    async fn register_otp_purge(&self) -> Result<(), AppError> {
        let queue = Arc::clone(&self.queue);
        let job = CronJob::new_async("0 0 3 * * *", move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            Box::pin(async move {
                tracing::debug!("Scheduling OTP purge job");
                let params = JobCreateParams {
                    job_type: "otp_purge".to_string(),
                    payload: serde_json::json!({"task": "otp_purge"}),
                    max_attempts: 1,
                    scheduled_at: None,
                };
                if let Err(e) = queue.enqueue(params).await {
                    tracing::error!("Failed to enqueue otp_purge: {}", e);
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create otp_purge schedule: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add otp_purge schedule: {}", e)))?;

        tracing::info!("Registered: otp_purge (daily at 3AM)");
        Ok(())
    }

    /// Usage report — Monday at 8 AM
    async fn register_usage_report(&self) -> Result<(), AppError> {
        let queue = Arc::clone(&self.queue);
        let job = CronJob::new_async("0 0 8 * * 1", move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            Box::pin(async move {
                tracing::debug!("Scheduling usage report job");
                let params = JobCreateParams {
                    job_type: "usage_report".to_string(),
                    payload: serde_json::json!({"task": "usage_report"}),
                    max_attempts: 3,
                    scheduled_at: None,
                };
                if let Err(e) = queue.enqueue(params).await {
                    tracing::error!("Failed to enqueue usage_report: {}", e);
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create usage_report schedule: {}", e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add usage_report schedule: {}", e))
        })?;

        tracing::info!("Registered: usage_report (Monday 8AM)");
        Ok(())
    }
}
