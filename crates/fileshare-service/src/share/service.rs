//! Shared file lifecycle service.
//!
//! Orchestrates the repository and the blob store for every operation
//! on a shared file. Ordering rules that matter here:
//!
//! - upload writes bytes before committing the record, so a reader can
//!   never observe a record whose bytes were not durably written (a
//!   crash between the steps leaks an orphaned blob, which is the
//!   acceptable direction);
//! - delete removes bytes before the record, so a crash between the
//!   steps leaves a policy-guarded record over missing bytes rather
//!   than unguarded bytes without a record.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use fileshare_core::error::AppError;
use fileshare_core::result::AppResult;
use fileshare_database::repositories::shared_file::SharedFileRepository;
use fileshare_entity::shared_file::{CreateSharedFile, SharedFile, SharedFilePatch};
use fileshare_storage::local::{BlobStream, LocalBlobStore};

use super::access::{AccessDecision, evaluate_access};
use super::token::TokenGenerator;

/// Parameters for uploading a new shared file.
#[derive(Debug, Clone)]
pub struct UploadParams {
    /// File content.
    pub data: Bytes,
    /// Original filename, kept for presentation.
    pub display_name: String,
    /// Share password (None = open download).
    pub credential: Option<String>,
    /// Relative expiry in days.
    pub expires_days: Option<i64>,
    /// Relative expiry in hours.
    pub expires_hours: Option<i64>,
    /// Maximum number of downloads.
    pub download_limit: Option<i32>,
    /// Owning caller identity.
    pub owner_id: Option<String>,
}

/// A permitted download: the consumed record plus its byte stream.
pub struct Download {
    /// The record after the download was accounted for.
    pub record: SharedFile,
    /// The backing bytes.
    pub stream: BlobStream,
    /// Blob size in bytes.
    pub size: u64,
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download")
            .field("record", &self.record)
            .field("stream", &"<stream>")
            .field("size", &self.size)
            .finish()
    }
}

/// Service owning the shared-file lifecycle: create, inspect, download
/// with atomic accounting, policy updates, ownership transfer, delete.
#[derive(Clone)]
pub struct ShareService {
    /// Shared file repository.
    repo: Arc<SharedFileRepository>,
    /// Blob store for backing bytes.
    blobs: Arc<LocalBlobStore>,
    /// Identifier generator.
    tokens: TokenGenerator,
}

impl std::fmt::Debug for ShareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareService").finish()
    }
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        repo: Arc<SharedFileRepository>,
        blobs: Arc<LocalBlobStore>,
        tokens: TokenGenerator,
    ) -> Self {
        Self { repo, blobs, tokens }
    }

    /// Upload a file: issue identifiers, persist the bytes, then commit
    /// the metadata record.
    pub async fn upload(&self, params: UploadParams) -> AppResult<SharedFile> {
        let token = self.tokens.issue_token();
        let storage_key = self.tokens.issue_storage_key(&params.display_name);
        let expires_at = relative_expiry(params.expires_days, params.expires_hours, Utc::now());

        self.blobs.write(&storage_key, params.data.clone()).await?;

        let record = CreateSharedFile {
            display_name: params.display_name,
            storage_key: storage_key.clone(),
            token,
            credential: params.credential,
            expires_at,
            download_limit: params.download_limit,
            owner_id: params.owner_id,
        };

        let file = match self.repo.create(&record).await {
            Ok(file) => file,
            Err(e) => {
                // The blob was already written; reclaim it so a failed
                // create does not leak bytes. Best effort; an orphaned
                // blob is tolerated, a phantom record is not.
                if let Err(cleanup) = self.blobs.delete(&storage_key).await {
                    warn!(storage_key, error = %cleanup, "Failed to clean up blob after create failure");
                }
                return Err(e);
            }
        };

        info!(
            token = %file.token,
            display_name = %file.display_name,
            size = params.data.len(),
            owner = file.owner_id.as_deref().unwrap_or("-"),
            "File uploaded"
        );
        Ok(file)
    }

    /// Fetch a record by token, without consuming a download.
    pub async fn info(&self, token: &str) -> AppResult<SharedFile> {
        self.repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// List every record owned by a caller.
    pub async fn list_by_owner(&self, owner_id: &str) -> AppResult<Vec<SharedFile>> {
        self.repo.find_by_owner(owner_id).await
    }

    /// Download a file: evaluate policy, atomically consume one
    /// download, then open the bytes.
    ///
    /// The limit/expiry predicates run twice on purpose: once here for
    /// a precise denial reason, and once inside the repository's
    /// conditional UPDATE, which is what actually guarantees the
    /// counter never overshoots under concurrency.
    pub async fn download(
        &self,
        token: &str,
        supplied_credential: Option<&str>,
    ) -> AppResult<Download> {
        let now = Utc::now();
        let record = self.repo.find_by_token(token).await?;
        evaluate_access(record.as_ref(), supplied_credential, now).into_result()?;

        let record = match self.repo.try_increment_download(token, now).await? {
            Some(updated) => updated,
            // The guard rejected the increment: another caller consumed
            // the last slot, the record expired, or it was deleted
            // between the read and the update. Re-read to classify.
            None => {
                let current = self.repo.find_by_token(token).await?;
                let reason = match evaluate_access(current.as_ref(), supplied_credential, Utc::now())
                {
                    AccessDecision::NotFound => AppError::not_found("File not found"),
                    AccessDecision::WrongCredential => {
                        AppError::wrong_credential("Invalid password")
                    }
                    AccessDecision::Expired => AppError::expired("File has expired"),
                    // A concurrent caller took the last slot between our
                    // policy read and the guarded update.
                    AccessDecision::Allowed | AccessDecision::LimitReached => {
                        AppError::limit_reached("Download limit reached")
                    }
                };
                return Err(reason);
            }
        };

        let (stream, size) = match self.blobs.read_stream(&record.storage_key).await {
            Ok(opened) => opened,
            Err(e) => {
                warn!(token, storage_key = %record.storage_key, "Record present but bytes missing");
                return Err(e);
            }
        };

        info!(
            token,
            count = record.download_count,
            limit = record.download_limit.map(|l| l.to_string()).unwrap_or_else(|| "-".into()),
            "Download consumed"
        );

        Ok(Download { record, stream, size })
    }

    /// Apply a partial policy update, gated on ownership when the
    /// requester supplies an identity.
    pub async fn update_policy(
        &self,
        token: &str,
        patch: SharedFilePatch,
        requesting_owner: Option<&str>,
    ) -> AppResult<SharedFile> {
        let current = self.info(token).await?;

        if let Some(requester) = requesting_owner {
            if current.owner_id.as_deref() != Some(requester) {
                return Err(AppError::forbidden(
                    "You don't have permission to modify this file",
                ));
            }
        }

        let credential = patch.resolved_credential(current.credential.as_deref());
        let expires_at = patch.expires_at.or(current.expires_at);
        let download_limit = patch.download_limit.or(current.download_limit);

        self.repo
            .update_policy(token, credential, expires_at, download_limit)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Reassign every record owned by `old_owner` to `new_owner`.
    /// Idempotent; an empty transfer reports zero.
    pub async fn transfer(&self, old_owner: &str, new_owner: &str) -> AppResult<u64> {
        let count = self.repo.reassign_owner(old_owner, new_owner).await?;
        info!(old_owner, new_owner, count, "Ownership transferred");
        Ok(count)
    }

    /// Delete a file: bytes first, then the record. A failed byte
    /// removal aborts before the record is touched.
    pub async fn delete(&self, token: &str) -> AppResult<()> {
        let record = self.info(token).await?;

        self.blobs.delete(&record.storage_key).await?;

        if !self.repo.delete_by_token(token).await? {
            // Bytes are gone and the record vanished concurrently; the
            // caller's intent is satisfied either way.
            return Err(AppError::not_found("File not found"));
        }

        info!(token, storage_key = %record.storage_key, "File deleted");
        Ok(())
    }
}

/// Compute an absolute expiry from relative day/hour inputs, additive
/// when both are given. Both absent means the file never expires.
pub fn relative_expiry(
    days: Option<i64>,
    hours: Option<i64>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if days.is_none() && hours.is_none() {
        return None;
    }
    let mut delta = Duration::zero();
    if let Some(days) = days {
        delta += Duration::days(days);
    }
    if let Some(hours) = hours {
        delta += Duration::hours(hours);
    }
    Some(now + delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_expiry_absent_means_never() {
        assert_eq!(relative_expiry(None, None, Utc::now()), None);
    }

    #[test]
    fn test_relative_expiry_is_additive() {
        let now = Utc::now();
        assert_eq!(
            relative_expiry(Some(1), Some(6), now),
            Some(now + Duration::days(1) + Duration::hours(6))
        );
        assert_eq!(
            relative_expiry(Some(2), None, now),
            Some(now + Duration::days(2))
        );
        assert_eq!(
            relative_expiry(None, Some(12), now),
            Some(now + Duration::hours(12))
        );
    }

    #[test]
    fn test_relative_expiry_zero_is_now() {
        let now = Utc::now();
        assert_eq!(relative_expiry(Some(0), None, now), Some(now));
    }
}
