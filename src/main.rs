//! FileShare object-store server.
//!
//! Main entry point that wires configuration, database, storage, and
//! the HTTP API together and starts the server.

use tracing_subscriber::{EnvFilter, fmt};

use fileshare_core::config::AppConfig;
use fileshare_core::config::logging::LoggingConfig;
use fileshare_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("FILESHARE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting FileShare v{}", env!("CARGO_PKG_VERSION"));

    let db = fileshare_database::DatabasePool::connect(&config.database).await?;
    fileshare_database::migration::run_migrations(db.pool()).await?;

    let bind_addr = config.server.bind_addr();
    let state = fileshare_api::AppState::build(config, db.into_pool()).await?;
    let router = fileshare_api::build_router(state);

    tracing::info!(addr = %bind_addr, "FileShare API listening");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {bind_addr}: {e}")))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| AppError::internal(format!("Server failed: {e}")))
}
