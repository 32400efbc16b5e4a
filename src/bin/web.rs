//! FileShare web server, the browser-facing collaborator.
//!
//! Proxies uploads and downloads to the object-store service and owns
//! the session-identity and filename-header concerns.

use tracing_subscriber::{EnvFilter, fmt};

use fileshare_core::config::WebAppConfig;
use fileshare_core::config::logging::LoggingConfig;
use fileshare_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("FILESHARE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match WebAppConfig::load(&env) {
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
async fn run(config: WebAppConfig) -> Result<(), AppError> {
    tracing::info!("Starting FileShare Web v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        upstream = %config.web.file_service_url,
        "Proxying to object-store service"
    );

    let bind_addr = config.server.bind_addr();
    let state = fileshare_web::WebState::build(config)?;
    let router = fileshare_web::build_router(state);

    tracing::info!(addr = %bind_addr, "FileShare Web listening");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {bind_addr}: {e}")))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| AppError::internal(format!("Server failed: {e}")))
}
