//! CLI command definitions and dispatch.

pub mod admin;
pub mod jobs;
pub mod migrate;
pub mod serve;
pub mod session;
pub mod user;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use prepdeck_core::error::AppError;

/// Prepdeck — Online Exam Preparation Platform
#[derive(Debug, Parser)]
#[command(name = "prepdeck", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (merges config/default.toml with config/<env>.toml)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the Prepdeck server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Admin account management
    Admin(admin::AdminArgs),
    /// User management
    User(user::UserArgs),
    /// Session management
    Session(session::SessionArgs),
    /// Background job queue management
    Jobs(jobs::JobsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.env).await,
            Commands::Migrate(args) => migrate::execute(args, &self.env).await,
            Commands::Admin(args) => admin::execute(args, &self.env).await,
            Commands::User(args) => user::execute(args, &self.env, self.format).await,
            Commands::Session(args) => session::execute(args, &self.env, self.format).await,
            Commands::Jobs(args) => jobs::execute(args, &self.env, self.format).await,
        }
    }
}

/// Helper: load configuration for the given environment
pub fn load_config(env: &str) -> Result<prepdeck_core::config::AppConfig, AppError> {
    prepdeck_core::config::AppConfig::load(env)
}

/// Helper: create database pool from config
pub async fn create_db_pool(
    config: &prepdeck_core::config::AppConfig,
) -> Result<sqlx::PgPool, AppError> {
    let pool = prepdeck_database::connection::DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}
