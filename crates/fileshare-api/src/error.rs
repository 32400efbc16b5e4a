//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use fileshare_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Status code and wire code for an error kind.
///
/// `ContentMissing` deliberately shares 404 with `NotFound` (matching
/// the object store's observable behavior) but keeps its own error code
/// so the two states stay distinguishable to operators and clients.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::ContentMissing => (StatusCode::NOT_FOUND, "CONTENT_MISSING"),
        ErrorKind::WrongCredential => (StatusCode::FORBIDDEN, "WRONG_CREDENTIAL"),
        ErrorKind::Expired => (StatusCode::GONE, "EXPIRED"),
        ErrorKind::LimitReached => (StatusCode::GONE, "LIMIT_REACHED"),
        ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::ExternalService => (StatusCode::BAD_GATEWAY, "EXTERNAL_SERVICE"),
        ErrorKind::Database
        | ErrorKind::Storage
        | ErrorKind::Configuration
        | ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

/// Wrapper implementing Axum's `IntoResponse` for the domain error.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = status_for(self.0.kind);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message: self.0.message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_denials_map_to_expected_statuses() {
        assert_eq!(status_for(ErrorKind::NotFound).0, StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(ErrorKind::WrongCredential).0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_for(ErrorKind::Expired).0, StatusCode::GONE);
        assert_eq!(status_for(ErrorKind::LimitReached).0, StatusCode::GONE);
        assert_eq!(status_for(ErrorKind::Forbidden).0, StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::Conflict).0, StatusCode::CONFLICT);
    }

    #[test]
    fn test_content_missing_is_distinct_404() {
        let (status, code) = status_for(ErrorKind::ContentMissing);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "CONTENT_MISSING");
        assert_ne!(code, status_for(ErrorKind::NotFound).1);
    }
}
