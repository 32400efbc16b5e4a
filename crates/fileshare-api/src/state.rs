//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use fileshare_auth::jwt::JwtCodec;
use fileshare_auth::password::PasswordHasher;
use fileshare_core::config::AppConfig;
use fileshare_database::repositories::shared_file::SharedFileRepository;
use fileshare_database::repositories::user::UserRepository;
use fileshare_service::share::service::ShareService;
use fileshare_service::share::token::TokenGenerator;
use fileshare_service::user::service::UserService;
use fileshare_storage::local::LocalBlobStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks; the composing binary
/// owns construction, nothing here is process-global.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Shared file lifecycle service.
    pub share_service: Arc<ShareService>,
    /// Account service.
    pub user_service: Arc<UserService>,
    /// Database pool, kept for health checks.
    pub db_pool: PgPool,
}

impl AppState {
    /// Wire up the full dependency graph from configuration and an
    /// established database pool.
    pub async fn build(config: AppConfig, db_pool: PgPool) -> fileshare_core::AppResult<Self> {
        let blobs = Arc::new(LocalBlobStore::new(&config.storage.upload_dir).await?);
        let shared_file_repo = Arc::new(SharedFileRepository::new(db_pool.clone()));
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let hasher = Arc::new(PasswordHasher::new());
        let jwt = Arc::new(JwtCodec::new(&config.auth));

        let share_service = Arc::new(ShareService::new(
            shared_file_repo,
            blobs,
            TokenGenerator::new(),
        ));
        let user_service = Arc::new(UserService::new(user_repo, hasher, jwt));

        Ok(Self {
            config: Arc::new(config),
            share_service,
            user_service,
            db_pool,
        })
    }
}
