//! Caller identity for shared-object ownership.
//!
//! A shared object is owned either by an anonymous browser session
//! (ephemeral identity minted by the web service) or by a registered
//! account. On the wire and in the database both are a single opaque
//! string; this type keeps the distinction inside the process.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the caller that owns a shared object.
///
/// The ownership-transfer operation is the only place the two variants
/// are reconciled: on login the web service rewrites every object owned
/// by the session's `Ephemeral` id to the account's `Account` id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum OwnerId {
    /// Pre-authentication identity, minted per browser session.
    Ephemeral(String),
    /// Identity backed by a registered account.
    Account(Uuid),
}

impl OwnerId {
    /// Wire representation used in URLs and the `owner_id` column.
    pub fn to_wire(&self) -> String {
        self.to_string()
    }

    /// Classify a wire string. Account ids are UUIDs; everything else is
    /// treated as an ephemeral session id. Used only by the web session
    /// layer; flows that already know the variant construct it directly.
    pub fn parse(wire: &str) -> Self {
        match Uuid::parse_str(wire) {
            Ok(uuid) => Self::Account(uuid),
            Err(_) => Self::Ephemeral(wire.to_string()),
        }
    }

    /// Whether this identity is backed by a registered account.
    pub fn is_account(&self) -> bool {
        matches!(self, Self::Account(_))
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ephemeral(id) => write!(f, "{id}"),
            Self::Account(id) => write!(f, "{id}"),
        }
    }
}

impl From<OwnerId> for String {
    fn from(owner: OwnerId) -> String {
        owner.to_string()
    }
}

impl TryFrom<String> for OwnerId {
    type Error = std::convert::Infallible;

    fn try_from(wire: String) -> Result<Self, Self::Error> {
        Ok(Self::parse(&wire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid_is_account() {
        let uuid = Uuid::new_v4();
        let owner = OwnerId::parse(&uuid.to_string());
        assert_eq!(owner, OwnerId::Account(uuid));
        assert!(owner.is_account());
    }

    #[test]
    fn test_parse_opaque_is_ephemeral() {
        let owner = OwnerId::parse("J5l2kM9qR3tXv7wY1zB4cA");
        assert_eq!(owner, OwnerId::Ephemeral("J5l2kM9qR3tXv7wY1zB4cA".into()));
        assert!(!owner.is_account());
    }

    #[test]
    fn test_wire_roundtrip() {
        let uuid = Uuid::new_v4();
        let owner = OwnerId::Account(uuid);
        let wire = owner.to_string();
        assert_eq!(OwnerId::parse(&wire), owner);
    }

    #[test]
    fn test_serde_is_transparent_string() {
        let owner = OwnerId::Ephemeral("abc123".into());
        let json = serde_json::to_string(&owner).expect("serialize");
        assert_eq!(json, "\"abc123\"");
        let parsed: OwnerId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, owner);
    }
}
