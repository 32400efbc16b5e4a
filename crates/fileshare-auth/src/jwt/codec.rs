//! Access token creation and validation with configurable signing and TTL.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use fileshare_core::config::auth::AuthConfig;
use fileshare_core::error::AppError;

use super::claims::AccessClaims;

/// Creates and validates signed HS256 access tokens.
#[derive(Clone)]
pub struct JwtCodec {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// HMAC secret key for validation.
    decoding_key: DecodingKey,
    /// Token TTL in days.
    ttl_days: i64,
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec")
            .field("ttl_days", &self.ttl_days)
            .finish()
    }
}

impl JwtCodec {
    /// Creates a new codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_days: config.token_ttl_days,
        }
    }

    /// Generates a new access token for the given account.
    pub fn issue(&self, account_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: account_id,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::days(self.ttl_days)).timestamp(),
            jti: Uuid::new_v4(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))
    }

    /// Validates a token's signature and expiry and returns its claims.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, AppError> {
        decode::<AccessClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AppError::unauthorized(format!("Invalid access token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> JwtCodec {
        JwtCodec::new(&AuthConfig {
            jwt_secret: "test-secret".into(),
            token_ttl_days: 30,
        })
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let codec = codec();
        let account_id = Uuid::new_v4();
        let token = codec.issue(account_id).unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, account_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let codec = codec();
        let token = codec.issue(Uuid::new_v4()).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(codec.verify(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = codec().issue(Uuid::new_v4()).unwrap();
        let other = JwtCodec::new(&AuthConfig {
            jwt_secret: "different-secret".into(),
            token_ttl_days: 30,
        });
        assert!(other.verify(&token).is_err());
    }
}
