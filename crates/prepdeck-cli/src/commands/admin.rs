//! Admin account management commands.

use clap::{Args, Subcommand};
use sqlx::PgPool;

use prepdeck_auth::PasswordHasher;
use prepdeck_core::error::AppError;
use prepdeck_database::repositories::UserRepository;
use prepdeck_entity::user::{CreateUser, UserRole, UserStatus};

use crate::output;

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create a new admin account
    Create {
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
        /// Display name
        #[arg(short, long)]
        display_name: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Reset an admin account's password
    ResetPassword {
        /// Email of the admin
        #[arg(short, long)]
        email: String,
        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// Execute admin commands
pub async fn execute(args: &AdminArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool: PgPool = super::create_db_pool(&config).await?;
    let user_repo = UserRepository::new(pool.clone());
    let hasher = PasswordHasher::new();

    match &args.command {
        AdminCommand::Create {
            email,
            display_name,
            password,
        } => {
            let email = match email {
                Some(e) => e.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Admin email")
                    .interact_text()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            if user_repo.find_by_email(&email).await?.is_some() {
                return Err(AppError::conflict(format!(
                    "A user with email '{email}' already exists"
                )));
            }

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Admin password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            let password_hash = hasher.hash_password(&password)?;

            let user = user_repo
                .create(&CreateUser {
                    email: Some(email.clone()),
                    phone: None,
                    password_hash: Some(password_hash),
                    display_name: display_name.clone(),
                    role: UserRole::Admin,
                    status: UserStatus::Active,
                    google_id: None,
                })
                .await?;

            output::print_success(&format!("Admin '{email}' created (id: {})", user.id));
        }
        AdminCommand::ResetPassword { email, password } => {
            let user = user_repo
                .find_by_email(email)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))?;

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("New password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            let password_hash = hasher.hash_password(&password)?;
            user_repo.update_password(user.id, &password_hash).await?;

            output::print_success(&format!("Password reset for '{email}'"));
        }
    }

    Ok(())
}
