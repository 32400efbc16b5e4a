//! Maps domain `AppError` to HTTP responses for the web surface.
//!
//! The mapping intentionally matches the object store's: a policy
//! denial that arrived as 403/404/410 upstream leaves this service with
//! the same status.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use fileshare_core::error::{AppError, ErrorKind};

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct WebErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Wrapper implementing Axum's `IntoResponse` for the domain error.
pub struct WebError(pub AppError);

impl From<AppError> for WebError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            ErrorKind::NotFound | ErrorKind::ContentMissing => StatusCode::NOT_FOUND,
            ErrorKind::WrongCredential | ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Expired | ErrorKind::LimitReached => StatusCode::GONE,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        let body = WebErrorResponse {
            error: self.0.kind.to_string(),
            message: self.0.message,
        };

        (status, Json(body)).into_response()
    }
}
