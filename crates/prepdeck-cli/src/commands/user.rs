//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use prepdeck_core::error::AppError;
use prepdeck_core::types::pagination::PageRequest;
use prepdeck_database::repositories::UserRepository;
use prepdeck_entity::user::{UserRole, UserStatus};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users
    List {
        /// Filter by role (student, instructor, admin)
        #[arg(short, long)]
        role: Option<String>,
        /// Page number
        #[arg(long, default_value = "1")]
        page: u64,
        /// Page size
        #[arg(long, default_value = "50")]
        per_page: u64,
    },
    /// Suspend a user account
    Suspend {
        /// Email address
        email: String,
    },
    /// Reactivate a suspended user account
    Activate {
        /// Email address
        email: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Email
    email: String,
    /// Phone
    phone: String,
    /// Role
    role: String,
    /// Status
    status: String,
    /// Created at
    created_at: String,
}

fn parse_role(role: &str) -> Result<UserRole, AppError> {
    match role.to_ascii_lowercase().as_str() {
        "student" => Ok(UserRole::Student),
        "instructor" => Ok(UserRole::Instructor),
        "admin" => Ok(UserRole::Admin),
        other => Err(AppError::validation(format!("Unknown role '{other}'"))),
    }
}

/// Execute user commands
pub async fn execute(args: &UserArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;
    let user_repo = UserRepository::new(pool.clone());

    match &args.command {
        UserCommand::List {
            role,
            page,
            per_page,
        } => {
            let page_req = PageRequest::new(*page, *per_page);
            let users = match role {
                Some(r) => user_repo.find_by_role(parse_role(r)?, &page_req).await?,
                None => user_repo.find_all(&page_req).await?,
            };

            let rows: Vec<UserRow> = users
                .items
                .iter()
                .map(|u| UserRow {
                    id: u.id.to_string(),
                    email: u.email.clone().unwrap_or_default(),
                    phone: u.phone.clone().unwrap_or_default(),
                    role: format!("{:?}", u.role),
                    status: format!("{:?}", u.status),
                    created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();

            output::print_list(&rows, format);
        }
        UserCommand::Suspend { email } => {
            let user = user_repo
                .find_by_email(email)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))?;

            user_repo
                .update_status(user.id, UserStatus::Suspended)
                .await?;
            output::print_success(&format!("User '{email}' suspended"));
        }
        UserCommand::Activate { email } => {
            let user = user_repo
                .find_by_email(email)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))?;

            user_repo.update_status(user.id, UserStatus::Active).await?;
            output::print_success(&format!("User '{email}' activated"));
        }
    }

    Ok(())
}
