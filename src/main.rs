//! Prepdeck server entry point.
//!
//! Loads configuration, connects to the database, runs migrations, and
//! hands off to the API crate which wires everything else together.

use tracing_subscriber::{EnvFilter, fmt};

use prepdeck_core::config::AppConfig;
use prepdeck_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("PREPDECK_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Loaded configuration for environment '{env}'");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Prepdeck v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let pool = prepdeck_database::connection::DatabasePool::connect(&config.database).await?;
    let db_pool = pool.into_pool();

    tracing::info!("Running database migrations...");
    prepdeck_database::migration::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    prepdeck_api::run_server(config, db_pool).await
}
