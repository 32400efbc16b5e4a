//! Shared file repository implementation.
//!
//! All reads, updates, and deletes are keyed by the public token; only
//! the ownership queries are keyed by `owner_id`. The download counter
//! is mutated exclusively through [`SharedFileRepository::try_increment_download`],
//! a single conditional UPDATE that carries the limit and expiry
//! predicates, so concurrent downloads can never overshoot the limit.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use fileshare_core::error::{AppError, ErrorKind};
use fileshare_core::result::AppResult;
use fileshare_entity::shared_file::{CreateSharedFile, SharedFile};

/// Repository for shared file CRUD and token lookup operations.
#[derive(Debug, Clone)]
pub struct SharedFileRepository {
    pool: PgPool,
}

impl SharedFileRepository {
    /// Create a new shared file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new record. A duplicate token or storage key surfaces as
    /// `Conflict`; the persistence layer enforces uniqueness even
    /// though the generator makes collisions practically unreachable.
    pub async fn create(&self, data: &CreateSharedFile) -> AppResult<SharedFile> {
        sqlx::query_as::<_, SharedFile>(
            "INSERT INTO shared_files \
             (display_name, storage_key, token, credential, expires_at, download_limit, owner_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&data.display_name)
        .bind(&data.storage_key)
        .bind(&data.token)
        .bind(&data.credential)
        .bind(data.expires_at)
        .bind(data.download_limit)
        .bind(&data.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Token or storage key already exists")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create shared file", e)
            }
        })
    }

    /// Find a record by token. `None` is indistinguishable between a
    /// token that never existed and one whose record was deleted.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<SharedFile>> {
        sqlx::query_as::<_, SharedFile>("SELECT * FROM shared_files WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find shared file by token", e)
            })
    }

    /// List records owned by a caller, newest first.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<SharedFile>> {
        sqlx::query_as::<_, SharedFile>(
            "SELECT * FROM shared_files WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list files by owner", e)
        })
    }

    /// Atomically consume one download: increment the counter only if
    /// the limit is not yet reached and the record is not expired at
    /// `now`. Returns the updated record, or `None` when the guard
    /// rejected the increment (the caller re-reads to classify why).
    ///
    /// The predicate and the increment execute as one statement, so two
    /// concurrent callers can never both pass a `download_limit` with a
    /// single slot left.
    pub async fn try_increment_download(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<SharedFile>> {
        sqlx::query_as::<_, SharedFile>(
            "UPDATE shared_files \
             SET download_count = download_count + 1 \
             WHERE token = $1 \
               AND (download_limit IS NULL OR download_count < download_limit) \
               AND (expires_at IS NULL OR expires_at >= $2) \
             RETURNING *",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to consume download", e)
        })
    }

    /// Overwrite the policy fields with their resolved final values.
    /// Returns the updated record, or `None` if the token is unknown.
    pub async fn update_policy(
        &self,
        token: &str,
        credential: Option<String>,
        expires_at: Option<DateTime<Utc>>,
        download_limit: Option<i32>,
    ) -> AppResult<Option<SharedFile>> {
        sqlx::query_as::<_, SharedFile>(
            "UPDATE shared_files \
             SET credential = $2, expires_at = $3, download_limit = $4 \
             WHERE token = $1 RETURNING *",
        )
        .bind(token)
        .bind(credential)
        .bind(expires_at)
        .bind(download_limit)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update file policy", e)
        })
    }

    /// Rewrite every record owned by `old_owner_id` to `new_owner_id`.
    /// Returns the number of records transferred; zero rows is a
    /// success, which makes the operation idempotent.
    pub async fn reassign_owner(&self, old_owner_id: &str, new_owner_id: &str) -> AppResult<u64> {
        let result = sqlx::query("UPDATE shared_files SET owner_id = $2 WHERE owner_id = $1")
            .bind(old_owner_id)
            .bind(new_owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to reassign owner", e)
            })?;
        Ok(result.rows_affected())
    }

    /// Delete a record by token. Returns whether a record was removed.
    pub async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM shared_files WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete shared file", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}

/// Whether a sqlx error is a PostgreSQL unique-constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
