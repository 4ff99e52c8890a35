//! Session and verification code cleanup job handlers.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use tracing;

use prepdeck_auth::SessionManager;
use prepdeck_database::repositories::OtpRepository;
use prepdeck_entity::job::model::Job;

use crate::executor::{JobExecutionError, JobHandler};

/// Consumed and stale verification codes are kept this long for auditing.
const OTP_RETENTION_DAYS: i64 = 30;

/// Handles session cleanup jobs
#[derive(Debug)]
pub struct SessionCleanupHandler {
    /// Session manager that owns the expiry sweep
    sessions: Arc<SessionManager>,
}

impl SessionCleanupHandler {
    /// Create a new session cleanup handler
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl JobHandler for SessionCleanupHandler {
    fn job_type(&self) -> &str {
        "session_cleanup"
    }

    async fn execute(&self, _job: &Job) -> Result<Option<Value>, JobExecutionError> {
        tracing::info!("Running session cleanup");

        let count = self
            .sessions
            .cleanup_expired()
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Session cleanup failed: {}", e)))?;

        tracing::info!("Cleaned up {} expired sessions", count);

        Ok(Some(serde_json::json!({
            "task": "session_cleanup",
            "expired_sessions_removed": count,
        })))
    }
}

/// Handles verification code purge jobs
#[derive(Debug)]
pub struct OtpPurgeHandler {
    /// Verification code repository
    otp_repo: Arc<OtpRepository>,
}

impl OtpPurgeHandler {
    /// Create a new OTP purge handler
    pub fn new(otp_repo: Arc<OtpRepository>) -> Self {
        Self { otp_repo }
    }
}

#[async_trait]
impl JobHandler for OtpPurgeHandler {
    fn job_type(&self) -> &str {
        "otp_purge"
    }

    async fn execute(&self, _job: &Job) -> Result<Option<Value>, JobExecutionError> {
        tracing::info!("Running OTP purge");

        let cutoff = Utc::now() - Duration::days(OTP_RETENTION_DAYS);
        let purged = self
            .otp_repo
            .purge_created_before(cutoff)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("OTP purge failed: {}", e)))?;

        tracing::info!("Purged {} verification codes older than {} days", purged, OTP_RETENTION_DAYS);

        Ok(Some(serde_json::json!({
            "task": "otp_purge",
            "cutoff": cutoff.to_rfc3339(),
            "codes_purged": purged,
        })))
    }
}
