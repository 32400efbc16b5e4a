//! Access policy evaluation for shared files.
//!
//! [`evaluate_access`] is a pure function over the record, the supplied
//! credential, and a caller-provided `now`. It never mutates the
//! download counter; the counter transition lives in the repository's
//! conditional UPDATE, which re-applies the same predicates atomically.

use chrono::{DateTime, Utc};

use fileshare_core::error::AppError;
use fileshare_entity::shared_file::SharedFile;

/// Outcome of evaluating a download attempt against a record's policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The download may proceed.
    Allowed,
    /// No record exists for the token.
    NotFound,
    /// The record requires a credential and the supplied one differs.
    WrongCredential,
    /// The record's expiration instant has passed.
    Expired,
    /// The record's download limit has been exhausted.
    LimitReached,
}

impl AccessDecision {
    /// Convert a denial into its application error; `Allowed` becomes `Ok`.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Self::Allowed => Ok(()),
            Self::NotFound => Err(AppError::not_found("File not found")),
            Self::WrongCredential => Err(AppError::wrong_credential("Invalid password")),
            Self::Expired => Err(AppError::expired("File has expired")),
            Self::LimitReached => Err(AppError::limit_reached("Download limit reached")),
        }
    }
}

/// Decide whether a download attempt is permitted.
///
/// The check order is fixed and short-circuiting: existence, then
/// credential, then expiry (strictly after; the boundary instant is
/// still valid), then download limit. Also used read-only by the info
/// endpoint, which must not consume a download.
pub fn evaluate_access(
    record: Option<&SharedFile>,
    supplied_credential: Option<&str>,
    now: DateTime<Utc>,
) -> AccessDecision {
    let Some(record) = record else {
        return AccessDecision::NotFound;
    };

    if let Some(required) = &record.credential {
        let supplied = supplied_credential.unwrap_or("");
        if !credential_matches(required, supplied) {
            return AccessDecision::WrongCredential;
        }
    }

    if record.is_expired(now) {
        return AccessDecision::Expired;
    }

    if record.is_limit_reached() {
        return AccessDecision::LimitReached;
    }

    AccessDecision::Allowed
}

/// Exact byte-for-byte credential comparison, constant-time in the
/// length of the stored credential so the comparison leaks neither a
/// matching prefix nor its length.
pub fn credential_matches(required: &str, supplied: &str) -> bool {
    let required = required.as_bytes();
    let supplied = supplied.as_bytes();

    let mut diff = required.len() ^ supplied.len();
    for (i, &byte) in required.iter().enumerate() {
        let other = supplied.get(i).copied().unwrap_or(0);
        diff |= (byte ^ other) as usize;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record() -> SharedFile {
        SharedFile {
            id: 1,
            display_name: "notes.txt".into(),
            storage_key: "c3RvcmFnZQ.txt".into(),
            token: "tok".into(),
            credential: None,
            expires_at: None,
            download_limit: None,
            download_count: 0,
            created_at: Utc::now(),
            owner_id: None,
        }
    }

    #[test]
    fn test_missing_record_is_not_found() {
        assert_eq!(
            evaluate_access(None, None, Utc::now()),
            AccessDecision::NotFound
        );
    }

    #[test]
    fn test_open_record_is_allowed() {
        assert_eq!(
            evaluate_access(Some(&record()), None, Utc::now()),
            AccessDecision::Allowed
        );
    }

    #[test]
    fn test_credential_gate() {
        let mut rec = record();
        rec.credential = Some("x".into());

        let now = Utc::now();
        assert_eq!(
            evaluate_access(Some(&rec), None, now),
            AccessDecision::WrongCredential
        );
        assert_eq!(
            evaluate_access(Some(&rec), Some("y"), now),
            AccessDecision::WrongCredential
        );
        assert_eq!(
            evaluate_access(Some(&rec), Some("x"), now),
            AccessDecision::Allowed
        );
    }

    #[test]
    fn test_credential_checked_before_expiry() {
        let mut rec = record();
        rec.credential = Some("secret".into());
        rec.expires_at = Some(Utc::now() - Duration::hours(1));

        // Wrong credential reported even though the record is also expired.
        assert_eq!(
            evaluate_access(Some(&rec), Some("nope"), Utc::now()),
            AccessDecision::WrongCredential
        );
        assert_eq!(
            evaluate_access(Some(&rec), Some("secret"), Utc::now()),
            AccessDecision::Expired
        );
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let mut rec = record();
        rec.expires_at = Some(now);

        assert_eq!(evaluate_access(Some(&rec), None, now), AccessDecision::Allowed);
        assert_eq!(
            evaluate_access(Some(&rec), None, now + Duration::milliseconds(1)),
            AccessDecision::Expired
        );
    }

    #[test]
    fn test_limit_reached() {
        let mut rec = record();
        rec.download_limit = Some(1);
        rec.download_count = 1;
        assert_eq!(
            evaluate_access(Some(&rec), None, Utc::now()),
            AccessDecision::LimitReached
        );
    }

    #[test]
    fn test_no_normalization_of_credentials() {
        // Comparison is exact: no trimming, no case folding, no Unicode
        // normalization.
        assert!(credential_matches("päss", "päss"));
        assert!(!credential_matches("pass", "Pass"));
        assert!(!credential_matches("pass", "pass "));
        assert!(!credential_matches("pass", ""));
        assert!(credential_matches("", ""));
    }
}
