//! Browser session identity.
//!
//! Every browser session carries an owner identity in a cookie: an
//! ephemeral id minted on first contact, replaced by the account id on
//! login. Uploads are tagged with whichever identity the session holds,
//! which is what makes the login-time ownership transfer possible.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use fileshare_core::types::OwnerId;

/// Cookie holding the session's owner identity (wire form).
pub const OWNER_COOKIE: &str = "fs_owner";
/// Cookie holding the account access token after login.
pub const AUTH_COOKIE: &str = "fs_token";

/// Identity state of the current browser session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Owner identity used to tag uploads and list files.
    pub owner: OwnerId,
    /// Access token, present only after login.
    pub access_token: Option<String>,
}

impl Session {
    /// Wire form of the session's owner identity.
    pub fn owner_id(&self) -> String {
        self.owner.to_wire()
    }
}

/// Resolve the session from the request's cookies, minting a fresh
/// ephemeral identity when none is present. The returned jar carries
/// any newly set cookie and must be included in the response.
pub fn resolve(jar: CookieJar) -> (Session, CookieJar) {
    let access_token = jar.get(AUTH_COOKIE).map(|c| c.value().to_string());

    if let Some(cookie) = jar.get(OWNER_COOKIE) {
        let owner = OwnerId::parse(cookie.value());
        return (
            Session {
                owner,
                access_token,
            },
            jar,
        );
    }

    let owner = OwnerId::Ephemeral(mint_ephemeral_id());
    let jar = jar.add(owner_cookie(owner.to_wire()));
    (
        Session {
            owner,
            access_token,
        },
        jar,
    )
}

/// Replace the session's identity with an authenticated account.
pub fn authenticate(jar: CookieJar, user_id: &str, access_token: &str) -> CookieJar {
    jar.add(owner_cookie(user_id.to_string()))
        .add(auth_cookie(access_token.to_string()))
}

/// Drop all session state.
pub fn clear(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::from(OWNER_COOKIE))
        .remove(Cookie::from(AUTH_COOKIE))
}

/// Mint a new ephemeral session identity: 16 bytes of CSPRNG output,
/// URL-safe encoded, same shape as the object store's identifiers.
fn mint_ephemeral_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn owner_cookie(value: String) -> Cookie<'static> {
    Cookie::build((OWNER_COOKIE, value))
        .path("/")
        .http_only(true)
        .build()
}

fn auth_cookie(value: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, value))
        .path("/")
        .http_only(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_mints_ephemeral_identity() {
        let (session, jar) = resolve(CookieJar::new());
        assert!(!session.owner.is_account());
        assert!(session.access_token.is_none());
        assert!(jar.get(OWNER_COOKIE).is_some());
    }

    #[test]
    fn test_resolve_keeps_existing_identity() {
        let jar = CookieJar::new().add(Cookie::new(OWNER_COOKIE, "existing-id"));
        let (session, _) = resolve(jar);
        assert_eq!(session.owner_id(), "existing-id");
    }

    #[test]
    fn test_authenticate_swaps_identity() {
        let (_, jar) = resolve(CookieJar::new());
        let jar = authenticate(jar, "11111111-2222-3333-4444-555555555555", "jwt");
        let (session, _) = resolve(jar);
        assert!(session.owner.is_account());
        assert_eq!(session.access_token.as_deref(), Some("jwt"));
    }

    #[test]
    fn test_minted_ids_are_unique() {
        assert_ne!(mint_ephemeral_id(), mint_ephemeral_id());
    }
}
