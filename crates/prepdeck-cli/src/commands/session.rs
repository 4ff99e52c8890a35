//! Session management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use prepdeck_core::error::AppError;
use prepdeck_core::types::pagination::PageRequest;
use prepdeck_database::repositories::SessionRepository;

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// List active sessions
    List {
        /// Page number
        #[arg(long, default_value = "1")]
        page: u64,
        /// Page size
        #[arg(long, default_value = "50")]
        per_page: u64,
    },
    /// End all sessions for a user
    End {
        /// User ID
        user_id: Uuid,
    },
    /// Deactivate all expired sessions
    Cleanup,
    /// Count active sessions
    Count,
}

/// Session display row
#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    /// Session ID
    id: String,
    /// User ID
    user_id: String,
    /// IP Address
    ip: String,
    /// Device
    device: String,
    /// Last Activity
    last_activity: String,
    /// Expires
    expires: String,
}

/// Execute session commands
pub async fn execute(args: &SessionArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;
    let session_repo = SessionRepository::new(pool.clone());

    match &args.command {
        SessionCommand::List { page, per_page } => {
            let sessions = session_repo
                .list_active(&PageRequest::new(*page, *per_page))
                .await?;

            let rows: Vec<SessionRow> = sessions
                .items
                .iter()
                .map(|s| SessionRow {
                    id: s.id.to_string(),
                    user_id: s.user_id.to_string(),
                    ip: s.ip_address.clone().unwrap_or_default(),
                    device: s.device_info.clone().unwrap_or_default(),
                    last_activity: s.last_activity_at.format("%Y-%m-%d %H:%M").to_string(),
                    expires: s.expires_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();

            output::print_list(&rows, format);
        }
        SessionCommand::End { user_id } => {
            let ended = session_repo.deactivate_all_for_user(*user_id).await?;
            output::print_success(&format!("Ended {ended} session(s) for user {user_id}"));
        }
        SessionCommand::Cleanup => {
            let removed = session_repo.deactivate_expired().await?;
            output::print_success(&format!("Deactivated {removed} expired session(s)"));
        }
        SessionCommand::Count => {
            let count = session_repo.count_all_active().await?;
            output::print_kv("Active sessions", &count.to_string());
        }
    }

    Ok(())
}
