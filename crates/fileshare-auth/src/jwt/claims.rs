//! Access token claims.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by a FileShare access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Account id the token was issued for.
    pub sub: Uuid,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiration, seconds since the epoch.
    pub exp: i64,
    /// Unique token id.
    pub jti: Uuid,
}
