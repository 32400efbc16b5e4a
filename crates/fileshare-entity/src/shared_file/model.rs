//! Shared file entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A file uploaded for sharing, addressed externally only by its token.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SharedFile {
    /// Surrogate primary key.
    pub id: i64,
    /// Original filename, used for presentation only.
    pub display_name: String,
    /// Generated identifier of the backing bytes. Never derived from the
    /// display name beyond its sanitized extension.
    pub storage_key: String,
    /// Public, unguessable download token.
    pub token: String,
    /// Share password. Downloads must supply an equal value when set.
    #[serde(skip_serializing, default)]
    pub credential: Option<String>,
    /// Instant after which downloads are denied. The boundary instant
    /// itself is still valid.
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum number of downloads. None = unlimited.
    pub download_limit: Option<i32>,
    /// Number of completed downloads.
    pub download_count: i32,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// Opaque identity of the owning caller. None = unowned.
    pub owner_id: Option<String>,
}

impl SharedFile {
    /// Whether the file is expired at `now`. Strictly-after semantics:
    /// the expiration instant itself is still downloadable.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now > expires_at,
            None => false,
        }
    }

    /// Whether the download limit has been exhausted.
    pub fn is_limit_reached(&self) -> bool {
        match self.download_limit {
            Some(limit) => self.download_count >= limit,
            None => false,
        }
    }

    /// Whether a share password is set. Reveals presence only.
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }
}

/// Data required to create a new shared file record.
#[derive(Debug, Clone)]
pub struct CreateSharedFile {
    /// Original filename.
    pub display_name: String,
    /// Generated storage key.
    pub storage_key: String,
    /// Generated download token.
    pub token: String,
    /// Share password (None = no password required).
    pub credential: Option<String>,
    /// Expiry instant (None = never expires).
    pub expires_at: Option<DateTime<Utc>>,
    /// Download limit (None = unlimited).
    pub download_limit: Option<i32>,
    /// Owning caller identity.
    pub owner_id: Option<String>,
}

/// Partial policy update for a shared file.
///
/// Each field is independently optional; absent fields are left
/// untouched. `remove_credential` clears the share password and wins
/// over a simultaneously supplied `credential`.
#[derive(Debug, Clone, Default)]
pub struct SharedFilePatch {
    /// New share password.
    pub credential: Option<String>,
    /// Clear the share password, regardless of `credential`.
    pub remove_credential: bool,
    /// New expiry instant.
    pub expires_at: Option<DateTime<Utc>>,
    /// New download limit.
    pub download_limit: Option<i32>,
}

impl SharedFilePatch {
    /// Resolve the credential this patch leaves on a record that
    /// currently stores `current`. Remove wins over set; absent leaves
    /// the current value.
    pub fn resolved_credential(&self, current: Option<&str>) -> Option<String> {
        if self.remove_credential {
            None
        } else if let Some(new) = &self.credential {
            Some(new.clone())
        } else {
            current.map(str::to_string)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_at: Option<DateTime<Utc>>, limit: Option<i32>, count: i32) -> SharedFile {
        SharedFile {
            id: 1,
            display_name: "report.pdf".into(),
            storage_key: "aGVsbG8.pdf".into(),
            token: "tok".into(),
            credential: None,
            expires_at,
            download_limit: limit,
            download_count: count,
            created_at: Utc::now(),
            owner_id: None,
        }
    }

    #[test]
    fn test_expiry_boundary_is_still_valid() {
        let now = Utc::now();
        let file = record(Some(now), None, 0);
        assert!(!file.is_expired(now));
        assert!(file.is_expired(now + Duration::milliseconds(1)));
    }

    #[test]
    fn test_no_expiry_never_expires() {
        let file = record(None, None, 0);
        assert!(!file.is_expired(Utc::now() + Duration::days(365 * 100)));
    }

    #[test]
    fn test_limit_reached_at_count() {
        assert!(!record(None, Some(3), 2).is_limit_reached());
        assert!(record(None, Some(3), 3).is_limit_reached());
        assert!(!record(None, None, 1_000_000).is_limit_reached());
    }

    #[test]
    fn test_remove_credential_wins_over_set() {
        let patch = SharedFilePatch {
            credential: Some("new-secret".into()),
            remove_credential: true,
            ..Default::default()
        };
        assert_eq!(patch.resolved_credential(Some("old")), None);
    }

    #[test]
    fn test_absent_credential_left_untouched() {
        let patch = SharedFilePatch::default();
        assert_eq!(patch.resolved_credential(Some("old")), Some("old".into()));
    }

    #[test]
    fn test_credential_not_serialized() {
        let mut file = record(None, None, 0);
        file.credential = Some("secret".into());
        let json = serde_json::to_value(&file).expect("serialize");
        assert!(json.get("credential").is_none());
    }
}
