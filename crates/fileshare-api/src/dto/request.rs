//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Account registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name.
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Account password. Bounded above so the hash input stays sane.
    #[validate(length(min = 6, max = 72, message = "Password must be 6-72 characters"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login name.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Account password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Partial policy update for a shared file.
///
/// Absent fields are left untouched. `remove_password` clears the share
/// password and wins over a simultaneously supplied `password`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFileRequest {
    /// New share password.
    pub password: Option<String>,
    /// New relative expiry, days component.
    pub expires_days: Option<i64>,
    /// New relative expiry, hours component.
    pub expires_hours: Option<i64>,
    /// New download limit.
    pub max_downloads: Option<i32>,
    /// Clear the share password.
    #[serde(default)]
    pub remove_password: bool,
}

/// Query string for download attempts.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadQuery {
    /// Supplied share password.
    pub password: Option<String>,
}

/// Query string carrying the requesting caller's identity.
#[derive(Debug, Clone, Deserialize)]
pub struct OwnerQuery {
    /// Requesting caller identity; when present, mutations are gated on it.
    pub owner_id: Option<String>,
}
