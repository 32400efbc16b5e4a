//! Local filesystem blob store.

use std::path::{Path, PathBuf};
use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

use fileshare_core::error::{AppError, ErrorKind};
use fileshare_core::result::AppResult;

/// Stream of byte chunks read from a stored blob.
pub type BlobStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Blob store rooted at a single upload directory.
///
/// Storage keys are generated identifiers (random stem plus sanitized
/// extension), so a key is always a single path component under the root.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored blobs.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a blob store rooted at the given directory, creating it if
    /// necessary.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create upload directory: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a storage key to its path under the root. Keys are
    /// generated, but separators are stripped anyway so a corrupt key
    /// cannot escape the root.
    fn resolve(&self, storage_key: &str) -> PathBuf {
        let name = Path::new(storage_key)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        self.root.join(name)
    }

    /// Write a blob. The write is flushed to disk before the call
    /// returns, so a metadata record committed afterwards never points
    /// at bytes that were not durably written.
    pub async fn write(&self, storage_key: &str, data: Bytes) -> AppResult<()> {
        let path = self.resolve(storage_key);
        let map_err = |e: std::io::Error| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {storage_key}"),
                e,
            )
        };

        let mut file = fs::File::create(&path).await.map_err(map_err)?;
        file.write_all(&data).await.map_err(map_err)?;
        file.sync_all().await.map_err(map_err)?;

        debug!(storage_key, bytes = data.len(), "Wrote blob");
        Ok(())
    }

    /// Read a whole blob into memory. Absent bytes are reported as
    /// `ContentMissing`, distinct from an unknown token.
    pub async fn read(&self, storage_key: &str) -> AppResult<Bytes> {
        let path = self.resolve(storage_key);
        let data = fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::content_missing(format!("Blob missing for key: {storage_key}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read blob: {storage_key}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    /// Open a blob as a chunked stream, with the blob's size.
    pub async fn read_stream(&self, storage_key: &str) -> AppResult<(BlobStream, u64)> {
        let path = self.resolve(storage_key);
        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::content_missing(format!("Blob missing for key: {storage_key}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open blob: {storage_key}"),
                    e,
                )
            }
        })?;

        let size = file
            .metadata()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to stat blob", e)
            })?
            .len();

        Ok((Box::pin(ReaderStream::new(file)), size))
    }

    /// Whether the blob exists on disk.
    pub async fn exists(&self, storage_key: &str) -> bool {
        fs::try_exists(self.resolve(storage_key))
            .await
            .unwrap_or(false)
    }

    /// Delete a blob. Deleting an already-absent blob succeeds; any
    /// other failure is surfaced so the caller does not proceed to drop
    /// the metadata record over still-present bytes.
    pub async fn delete(&self, storage_key: &str) -> AppResult<()> {
        let path = self.resolve(storage_key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(storage_key, "Deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {storage_key}"),
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream::StreamExt;

    async fn store() -> (tempfile::TempDir, LocalBlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_write_read_delete() {
        let (_dir, store) = store().await;

        let data = Bytes::from("hello world");
        store.write("aGVsbG8.txt", data.clone()).await.unwrap();

        assert!(store.exists("aGVsbG8.txt").await);
        assert_eq!(store.read("aGVsbG8.txt").await.unwrap(), data);

        store.delete("aGVsbG8.txt").await.unwrap();
        assert!(!store.exists("aGVsbG8.txt").await);
    }

    #[tokio::test]
    async fn test_missing_blob_is_content_missing() {
        let (_dir, store) = store().await;
        let err = store.read("does-not-exist.bin").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ContentMissing);
    }

    #[tokio::test]
    async fn test_delete_absent_blob_is_ok() {
        let (_dir, store) = store().await;
        store.delete("never-written.bin").await.unwrap();
    }

    #[tokio::test]
    async fn test_read_stream_concatenates_to_original() {
        let (_dir, store) = store().await;
        let data = Bytes::from(vec![7u8; 256 * 1024]);
        store.write("big.bin", data.clone()).await.unwrap();

        let (mut stream, size) = store.read_stream("big.bin").await.unwrap();
        assert_eq!(size, data.len() as u64);

        let mut collected = Vec::new();
        while let Some(chunk) = stream.next().await {
            collected.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(Bytes::from(collected), data);
    }

    #[tokio::test]
    async fn test_separators_in_key_cannot_escape_root() {
        let (dir, store) = store().await;
        store
            .write("../escape.txt", Bytes::from("x"))
            .await
            .unwrap();
        // The blob lands inside the root, not beside it.
        assert!(dir.path().join("escape.txt").exists());
        assert_eq!(store.read("escape.txt").await.unwrap(), Bytes::from("x"));
    }
}
