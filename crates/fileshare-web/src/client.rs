//! Typed client for the object-store service.
//!
//! Mirrors the object store's wire shapes; policy outcomes arrive as
//! HTTP statuses plus machine-readable error codes and are mapped back
//! into the same `ErrorKind`s the upstream raised, so the proxy
//! surfaces identical failures to its own callers.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use fileshare_core::error::{AppError, ErrorKind};
use fileshare_core::result::AppResult;

/// Upload response from the object store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
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
    /// Download URL relative to the object store.
    pub download_url: String,
}

/// Metadata view of a shared file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
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
    /// Whether the file is expired.
    pub is_expired: bool,
    /// Whether the download limit is exhausted.
    pub is_limit_reached: bool,
    /// Whether a share password is set.
    pub has_password: bool,
    /// Owning caller identity.
    pub owner_id: Option<String>,
}

/// Ownership transfer confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOutcome {
    /// Human-readable summary.
    pub message: String,
    /// Number of records transferred.
    pub count: u64,
}

/// Bearer credential issued by the object store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Signed access token.
    pub access_token: String,
    /// Token type, `bearer`.
    pub token_type: String,
    /// Account identity string.
    pub user_id: String,
}

/// Error body emitted by the object store.
#[derive(Debug, Clone, Deserialize)]
struct UpstreamError {
    error: String,
    message: String,
}

/// Optional policy fields accepted by upload.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Share password.
    pub password: Option<String>,
    /// Relative expiry, days component.
    pub expires_days: Option<i64>,
    /// Relative expiry, hours component.
    pub expires_hours: Option<i64>,
    /// Download limit.
    pub max_downloads: Option<i32>,
    /// Owning caller identity.
    pub owner_id: Option<String>,
}

/// Partial policy update forwarded to the object store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileUpdate {
    /// New share password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// New relative expiry, days component.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_days: Option<i64>,
    /// New relative expiry, hours component.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_hours: Option<i64>,
    /// New download limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_downloads: Option<i32>,
    /// Clear the share password.
    pub remove_password: bool,
}

/// A proxied download: upstream filename hint plus the byte stream.
pub struct FetchedFile {
    /// Content length reported upstream, if any.
    pub content_length: Option<u64>,
    /// Byte stream from the object store.
    pub stream: Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send + Unpin>,
}

/// Client for the object-store HTTP API.
///
/// Explicitly constructed with its base URL and injected where needed;
/// no process-wide singletons.
#[derive(Debug, Clone)]
pub struct FileServiceClient {
    base_url: String,
    http: reqwest::Client,
}

impl FileServiceClient {
    /// Create a client for the object store at `base_url`.
    pub fn new(base_url: &str, request_timeout: Duration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Upload a file on behalf of a caller.
    pub async fn upload_file(
        &self,
        data: Bytes,
        filename: &str,
        options: UploadOptions,
    ) -> AppResult<UploadedFile> {
        let part = reqwest::multipart::Part::stream(data)
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| AppError::internal(format!("Invalid multipart part: {e}")))?;

        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(password) = options.password {
            form = form.text("password", password);
        }
        if let Some(days) = options.expires_days {
            form = form.text("expires_days", days.to_string());
        }
        if let Some(hours) = options.expires_hours {
            form = form.text("expires_hours", hours.to_string());
        }
        if let Some(limit) = options.max_downloads {
            form = form.text("max_downloads", limit.to_string());
        }
        if let Some(owner) = options.owner_id {
            form = form.text("owner_id", owner);
        }

        let response = self
            .http
            .post(self.url("/api/files/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        Self::json(response).await
    }

    /// Fetch a file's metadata.
    pub async fn get_file_info(&self, token: &str) -> AppResult<FileInfo> {
        let response = self
            .http
            .get(self.url(&format!("/api/files/info/{token}")))
            .send()
            .await
            .map_err(transport_error)?;

        Self::json(response).await
    }

    /// List files owned by a caller.
    pub async fn get_user_files(&self, owner_id: &str) -> AppResult<Vec<FileInfo>> {
        let response = self
            .http
            .get(self.url(&format!("/api/files/user/{owner_id}")))
            .send()
            .await
            .map_err(transport_error)?;

        Self::json(response).await
    }

    /// Open a download as a byte stream. Policy denials surface with the
    /// upstream's own kinds.
    pub async fn download_file(
        &self,
        token: &str,
        password: Option<&str>,
    ) -> AppResult<FetchedFile> {
        let mut request = self
            .http
            .get(self.url(&format!("/api/files/download/{token}")));
        if let Some(password) = password {
            request = request.query(&[("password", password)]);
        }

        let response = request.send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        Ok(FetchedFile {
            content_length: response.content_length(),
            stream: Box::new(response.bytes_stream()),
        })
    }

    /// Forward a partial policy update.
    pub async fn update_file(
        &self,
        token: &str,
        update: &FileUpdate,
        owner_id: Option<&str>,
    ) -> AppResult<FileInfo> {
        let mut request = self
            .http
            .patch(self.url(&format!("/api/files/{token}")))
            .json(update);
        if let Some(owner) = owner_id {
            request = request.query(&[("owner_id", owner)]);
        }

        let response = request.send().await.map_err(transport_error)?;
        Self::json(response).await
    }

    /// Reassign everything owned by `old_owner_id` to `new_owner_id`.
    pub async fn transfer_files(
        &self,
        old_owner_id: &str,
        new_owner_id: &str,
    ) -> AppResult<TransferOutcome> {
        let response = self
            .http
            .post(self.url(&format!(
                "/api/files/transfer/{old_owner_id}/{new_owner_id}"
            )))
            .send()
            .await
            .map_err(transport_error)?;

        Self::json(response).await
    }

    /// Delete a file.
    pub async fn delete_file(&self, token: &str) -> AppResult<()> {
        let response = self
            .http
            .delete(self.url(&format!("/api/files/{token}")))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    /// Register a new account.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<IssuedToken> {
        let response = self
            .http
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .map_err(transport_error)?;

        Self::json(response).await
    }

    /// Authenticate an account.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<IssuedToken> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .map_err(transport_error)?;

        Self::json(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        response.json::<T>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Malformed response from file service",
                e,
            )
        })
    }

    /// Rebuild the upstream's error from its status and body, so the
    /// proxy re-raises the same kind (and the same status downstream).
    async fn error_from(response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.json::<UpstreamError>().await.ok();

        let (code, message) = match body {
            Some(err) => (Some(err.error), err.message),
            None => (None, format!("File service returned {status}")),
        };

        let kind = match code.as_deref() {
            Some("NOT_FOUND") => ErrorKind::NotFound,
            Some("CONTENT_MISSING") => ErrorKind::ContentMissing,
            Some("WRONG_CREDENTIAL") => ErrorKind::WrongCredential,
            Some("EXPIRED") => ErrorKind::Expired,
            Some("LIMIT_REACHED") => ErrorKind::LimitReached,
            Some("UNAUTHORIZED") => ErrorKind::Unauthorized,
            Some("FORBIDDEN") => ErrorKind::Forbidden,
            Some("VALIDATION_ERROR") => ErrorKind::Validation,
            Some("CONFLICT") => ErrorKind::Conflict,
            _ => kind_from_status(status),
        };

        AppError::new(kind, message)
    }
}

/// Fallback mapping when the upstream body carried no error code.
fn kind_from_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::FORBIDDEN => ErrorKind::Forbidden,
        StatusCode::GONE => ErrorKind::Expired,
        StatusCode::UNAUTHORIZED => ErrorKind::Unauthorized,
        StatusCode::BAD_REQUEST => ErrorKind::Validation,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        _ => ErrorKind::ExternalService,
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    AppError::with_source(ErrorKind::ExternalService, "File service unreachable", err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client =
            FileServiceClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.url("/api/files/info/abc"),
            "http://localhost:8000/api/files/info/abc"
        );
    }

    #[test]
    fn test_status_fallback_mapping() {
        assert_eq!(
            kind_from_status(StatusCode::NOT_FOUND),
            ErrorKind::NotFound
        );
        assert_eq!(kind_from_status(StatusCode::GONE), ErrorKind::Expired);
        assert_eq!(
            kind_from_status(StatusCode::BAD_GATEWAY),
            ErrorKind::ExternalService
        );
    }
}
