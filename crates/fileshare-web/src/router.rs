//! Route definitions for the browser-facing service.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::WebState;

/// Build the web service router.
pub fn build_router(state: WebState) -> Router {
    let max_upload = state.config.web.max_upload_size_bytes as usize;

    Router::new()
        .route("/upload", post(handlers::upload))
        .route("/files", get(handlers::my_files))
        .route(
            "/files/{token}",
            patch(handlers::update_file).delete(handlers::delete_file),
        )
        .route("/d/{token}", get(handlers::download))
        .route("/auth/login", post(handlers::login))
        .route("/auth/register", post(handlers::register))
        .route("/auth/logout", post(handlers::logout))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
