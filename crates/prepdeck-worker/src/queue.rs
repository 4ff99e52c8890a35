//! Job queue abstraction for enqueuing and dequeuing background jobs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing;
use uuid::Uuid;

use prepdeck_core::error::AppError;
use prepdeck_database::repositories::JobRepository;
use prepdeck_entity::job::model::{CreateJob, Job};
use prepdeck_entity::job::status::JobStatus;

/// Parameters for creating a new job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreateParams {
    /// Type of job (e.g., "session_cleanup", "otp_purge")
    pub job_type: String,
    /// Job payload as JSON
    pub payload: serde_json::Value,
    /// Maximum retry attempts
    pub max_attempts: i32,
    /// Optional scheduled time (run after this time)
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Job queue for enqueuing and dequeuing work
#[derive(Debug, Clone)]
pub struct JobQueue {
    /// Job repository for database persistence
    repo: Arc<JobRepository>,
    /// Worker identifier for claiming jobs
    worker_id: String,
}

impl JobQueue {
    /// Create a new job queue
    pub fn new(repo: Arc<JobRepository>, worker_id: String) -> Self {
        Self { repo, worker_id }
    }

    /// Enqueue a new job
    pub async fn enqueue(&self, params: JobCreateParams) -> Result<Job, AppError> {
        let job = self
            .repo
            .create(&CreateJob {
                job_type: params.job_type,
                payload: params.payload,
                max_attempts: params.max_attempts,
                scheduled_at: params.scheduled_at,
            })
            .await?;

        tracing::debug!("Enqueued job: id={}, type='{}'", job.id, job.job_type);

        Ok(job)
    }

    /// Dequeue the next available job
    pub async fn dequeue(&self) -> Result<Option<Job>, AppError> {
        let job = self.repo.claim_next(&self.worker_id).await?;

        if let Some(job) = &job {
            tracing::debug!("Dequeued job: id={}, type='{}'", job.id, job.job_type);
        }

        Ok(job)
    }

    /// Mark a job as completed successfully
    pub async fn complete(
        &self,
        job_id: Uuid,
        result: Option<serde_json::Value>,
    ) -> Result<(), AppError> {
        self.repo.complete(job_id, result.as_ref()).await?;
        tracing::debug!("Job completed: id={}", job_id);
        Ok(())
    }

    /// Mark a job as failed
    pub async fn fail(&self, job_id: Uuid, error: &str) -> Result<(), AppError> {
        self.repo.fail(job_id, error).await?;
        tracing::debug!("Job failed: id={}, error='{}'", job_id, error);
        Ok(())
    }

    /// Retry a failed job
    pub async fn retry(&self, job_id: Uuid) -> Result<(), AppError> {
        self.repo.retry(job_id).await?;
        tracing::debug!("Job retried: id={}", job_id);
        Ok(())
    }

    /// Get queue statistics
    pub async fn stats(&self) -> Result<QueueStats, AppError> {
        let pending = self.repo.count_by_status(JobStatus::Pending).await?;
        let running = self.repo.count_by_status(JobStatus::Running).await?;
        let failed = self.repo.count_by_status(JobStatus::Failed).await?;

        Ok(QueueStats {
            pending,
            running,
            failed,
            worker_id: self.worker_id.clone(),
        })
    }
}

/// Queue statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStats {
    /// Number of pending jobs
    pub pending: u64,
    /// Number of running jobs
    pub running: u64,
    /// Number of failed jobs
    pub failed: u64,
    /// Current worker identifier
    pub worker_id: String,
}
