//! Weekly usage report job handler.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use prepdeck_entity::job::model::Job;
use prepdeck_notify::{Notifier, message};
use prepdeck_service::AnalyticsService;

use crate::executor::{JobExecutionError, JobHandler};

/// Handles weekly usage report generation.
///
/// The snapshot is stored as the job result either way; email delivery is
/// best-effort and only attempted when a recipient is configured.
#[derive(Debug)]
pub struct UsageReportHandler {
    /// Analytics service used to build the snapshot
    analytics: Arc<AnalyticsService>,
    /// Outbound delivery
    notifier: Arc<Notifier>,
    /// Recipient for the report email
    report_email: Option<String>,
}

impl UsageReportHandler {
    /// Create a new usage report handler
    pub fn new(
        analytics: Arc<AnalyticsService>,
        notifier: Arc<Notifier>,
        report_email: Option<String>,
    ) -> Self {
        Self {
            analytics,
            notifier,
            report_email,
        }
    }
}

#[async_trait]
impl JobHandler for UsageReportHandler {
    fn job_type(&self) -> &str {
        "usage_report"
    }

    async fn execute(&self, _job: &Job) -> Result<Option<Value>, JobExecutionError> {
        tracing::info!("Generating usage report");

        let overview = self.analytics.build_overview().await.map_err(|e| {
            JobExecutionError::Transient(format!("Failed to build usage snapshot: {}", e))
        })?;

        let snapshot = serde_json::to_value(&overview).map_err(|e| {
            JobExecutionError::Permanent(format!("Failed to serialize snapshot: {}", e))
        })?;

        match &self.report_email {
            Some(to) => {
                let email = message::usage_report_email(to, &snapshot);
                if let Err(e) = self.notifier.send_email(&email).await {
                    tracing::warn!("Could not deliver usage report to {}: {}", to, e);
                }
            }
            None => tracing::debug!("No report recipient configured, skipping delivery"),
        }

        tracing::info!("Usage report generated");
        Ok(Some(snapshot))
    }
}
