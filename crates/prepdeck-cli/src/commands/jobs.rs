//! Background job queue management commands.

use chrono::{Duration, Utc};
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use prepdeck_core::error::AppError;
use prepdeck_database::repositories::JobRepository;
use prepdeck_entity::job::{CreateJob, JobStatus};

/// Arguments for jobs commands
#[derive(Debug, Args)]
pub struct JobsArgs {
    /// Jobs subcommand
    #[command(subcommand)]
    pub command: JobsCommand,
}

/// Jobs subcommands
#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// Show queue status counts
    Status,
    /// Show a single job
    Show {
        /// Job ID
        id: Uuid,
    },
    /// Re-queue a failed job
    Retry {
        /// Job ID
        id: Uuid,
    },
    /// Delete finished jobs older than the given number of days
    Cleanup {
        /// Age threshold in days
        #[arg(long, default_value = "30")]
        days: i64,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Enqueue a job by type
    Trigger {
        /// Job type to trigger
        job_type: String,
        /// JSON payload
        #[arg(short, long, default_value = "{}")]
        payload: String,
    },
}

/// Execute jobs commands
pub async fn execute(args: &JobsArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;
    let job_repo = JobRepository::new(pool.clone());

    match &args.command {
        JobsCommand::Status => {
            let pending = job_repo.count_by_status(JobStatus::Pending).await?;
            let running = job_repo.count_by_status(JobStatus::Running).await?;
            let completed = job_repo.count_by_status(JobStatus::Completed).await?;
            let failed = job_repo.count_by_status(JobStatus::Failed).await?;

            println!("Job Queue Status:");
            output::print_kv("Pending", &pending.to_string());
            output::print_kv("Running", &running.to_string());
            output::print_kv("Completed", &completed.to_string());
            output::print_kv("Failed", &failed.to_string());
            output::print_kv("Worker Enabled", &config.worker.enabled.to_string());
            output::print_kv("Concurrency", &config.worker.concurrency.to_string());
        }
        JobsCommand::Show { id } => {
            let job = job_repo
                .find_by_id(*id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Job {id} not found")))?;
            output::print_item(&job, format);
        }
        JobsCommand::Retry { id } => {
            let job = job_repo
                .find_by_id(*id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Job {id} not found")))?;
            if job.status != JobStatus::Failed {
                return Err(AppError::validation(format!(
                    "Job {id} is {:?}, only failed jobs can be retried",
                    job.status
                )));
            }
            job_repo.retry(*id).await?;
            output::print_success(&format!("Job {id} re-queued"));
        }
        JobsCommand::Cleanup { days, force } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete completed and failed jobs older than {days} day(s)?"
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let before = Utc::now() - Duration::days(*days);
            let removed = job_repo.cleanup_old(before).await?;
            output::print_success(&format!("Removed {removed} old job(s)"));
        }
        JobsCommand::Trigger { job_type, payload } => {
            let payload_value: serde_json::Value = serde_json::from_str(payload)
                .map_err(|e| AppError::validation(format!("Invalid JSON payload: {e}")))?;

            let job = job_repo
                .create(&CreateJob {
                    job_type: job_type.clone(),
                    payload: payload_value,
                    max_attempts: config.worker.max_attempts,
                    scheduled_at: None,
                })
                .await?;

            output::print_success(&format!("Job '{job_type}' enqueued (id: {})", job.id));
        }
    }

    Ok(())
}
