//! Route definitions for the FileShare object-store HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(file_routes())
        .merge(auth_routes())
        .route("/health", get(handlers::health::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Shared file endpoints: upload, info, download, listing, policy
/// updates, ownership transfer, delete.
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files/upload", post(handlers::file::upload_file))
        .route("/files/info/{token}", get(handlers::file::get_file_info))
        .route(
            "/files/download/{token}",
            get(handlers::file::download_file),
        )
        .route("/files/user/{owner_id}", get(handlers::file::list_user_files))
        .route(
            "/files/transfer/{old_owner_id}/{new_owner_id}",
            post(handlers::file::transfer_files),
        )
        .route(
            "/files/{token}",
            patch(handlers::file::update_file).delete(handlers::file::delete_file),
        )
}

/// Account endpoints: register, login, current identity.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}
