//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fileshare_entity::shared_file::SharedFile;

/// Response returned by a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Record id.
    pub id: i64,
    /// Original filename.
    pub filename: String,
    /// Public download token.
    pub token: String,
    /// Expiry instant, if any.
    pub expires_at: Option<DateTime<Utc>>,
    /// Download limit, if any.
    pub max_downloads: Option<i32>,
    /// Downloads so far (zero on upload).
    pub download_count: i32,
    /// Upload instant.
    pub created_at: DateTime<Utc>,
    /// Relative download URL on this service.
    pub download_url: String,
}

impl From<SharedFile> for UploadResponse {
    fn from(file: SharedFile) -> Self {
        let download_url = format!("/api/files/download/{}", file.token);
        Self {
            id: file.id,
            filename: file.display_name,
            token: file.token,
            expires_at: file.expires_at,
            max_downloads: file.download_limit,
            download_count: file.download_count,
            created_at: file.created_at,
            download_url,
        }
    }
}

/// Metadata view of a shared file, with computed policy flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfoResponse {
    /// Record id.
    pub id: i64,
    /// Original filename.
    pub filename: String,
    /// Public download token.
    pub token: String,
    /// Expiry instant, if any.
    pub expires_at: Option<DateTime<Utc>>,
    /// Download limit, if any.
    pub max_downloads: Option<i32>,
    /// Downloads so far.
    pub download_count: i32,
    /// Upload instant.
    pub created_at: DateTime<Utc>,
    /// Whether the file is expired at response time.
    pub is_expired: bool,
    /// Whether the download limit is exhausted.
    pub is_limit_reached: bool,
    /// Whether a share password is set. Presence only, never the value.
    pub has_password: bool,
    /// Owning caller identity.
    pub owner_id: Option<String>,
}

impl FileInfoResponse {
    /// Build the info view, computing the policy flags at `now`.
    pub fn from_record(file: SharedFile, now: DateTime<Utc>) -> Self {
        let is_expired = file.is_expired(now);
        let is_limit_reached = file.is_limit_reached();
        let has_password = file.has_credential();
        Self {
            id: file.id,
            filename: file.display_name,
            token: file.token,
            expires_at: file.expires_at,
            max_downloads: file.download_limit,
            download_count: file.download_count,
            created_at: file.created_at,
            is_expired,
            is_limit_reached,
            has_password,
            owner_id: file.owner_id,
        }
    }
}

/// Response for the ownership transfer endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResponse {
    /// Human-readable summary.
    pub message: String,
    /// Number of records transferred. Zero on an empty transfer.
    pub count: u64,
}

/// Bearer credential issued on registration or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed access token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    /// Account identity string.
    pub user_id: String,
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Account id.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
}

/// Generic confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SharedFile {
        SharedFile {
            id: 7,
            display_name: "データ.csv".into(),
            storage_key: "cmFuZG9t.csv".into(),
            token: "tok123".into(),
            credential: Some("pw".into()),
            expires_at: None,
            download_limit: Some(2),
            download_count: 2,
            created_at: Utc::now(),
            owner_id: Some("owner-1".into()),
        }
    }

    #[test]
    fn test_info_computes_flags() {
        let info = FileInfoResponse::from_record(record(), Utc::now());
        assert!(!info.is_expired);
        assert!(info.is_limit_reached);
        assert!(info.has_password);
    }

    #[test]
    fn test_upload_response_carries_download_url() {
        let resp = UploadResponse::from(record());
        assert_eq!(resp.download_url, "/api/files/download/tok123");
        assert_eq!(resp.filename, "データ.csv");
    }

    #[test]
    fn test_info_never_exposes_credential_value() {
        let json = serde_json::to_value(FileInfoResponse::from_record(record(), Utc::now()))
            .expect("serialize");
        assert_eq!(json.get("has_password"), Some(&serde_json::json!(true)));
        assert!(json.get("password").is_none());
        assert!(json.get("credential").is_none());
    }
}
