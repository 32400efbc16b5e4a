//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod database;
pub mod logging;
pub mod server;
pub mod storage;
pub mod web;

use serde::{Deserialize, Serialize};

use self::auth::AuthConfig;
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;
use self::server::ServerConfig;
use self::storage::StorageConfig;
use self::web::WebConfig;

use crate::error::AppError;

/// Root configuration for the object-store service.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// File storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Authentication settings.
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Root configuration for the browser-facing web service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebAppConfig {
    /// HTTP server settings.
    #[serde(default = "default_web_server")]
    pub server: ServerConfig,
    /// Collaborator and upload settings.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `FILESHARE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        build_config(env)?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

impl WebAppConfig {
    /// Load web-service configuration, same layering as [`AppConfig::load`].
    pub fn load(env: &str) -> Result<Self, AppError> {
        build_config(env)?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

fn default_web_server() -> ServerConfig {
    ServerConfig {
        port: 8001,
        ..ServerConfig::default()
    }
}

fn build_config(env: &str) -> Result<config::Config, AppError> {
    config::Config::builder()
        .add_source(config::File::with_name("config/default").required(false))
        .add_source(config::File::with_name(&format!("config/{env}")).required(false))
        .add_source(
            config::Environment::with_prefix("FILESHARE")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))
}
