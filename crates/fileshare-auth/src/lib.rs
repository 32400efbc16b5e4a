//! # fileshare-auth
//!
//! Account authentication primitives: Argon2id password hashing and
//! HS256 access tokens. Share passwords are *not* handled here; their
//! exact-match contract lives in `fileshare-service`.

pub mod jwt;
pub mod password;

pub use jwt::{AccessClaims, JwtCodec};
pub use password::PasswordHasher;
