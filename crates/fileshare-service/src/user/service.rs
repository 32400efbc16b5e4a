//! Account registration, login, and identity lookup.

use std::sync::Arc;

use tracing::info;

use fileshare_auth::jwt::JwtCodec;
use fileshare_auth::password::PasswordHasher;
use fileshare_core::error::AppError;
use fileshare_core::result::AppResult;
use fileshare_database::repositories::user::UserRepository;
use fileshare_entity::user::{CreateUser, User};

/// A freshly issued bearer credential for an account.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IssuedToken {
    /// Signed access token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    /// The account's identity string, used as `owner_id` on shared files.
    pub user_id: String,
}

/// Service for account lifecycle operations.
#[derive(Clone)]
pub struct UserService {
    /// User repository.
    repo: Arc<UserRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Access token codec.
    jwt: Arc<JwtCodec>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish()
    }
}

impl UserService {
    /// Creates a new user service.
    pub fn new(repo: Arc<UserRepository>, hasher: Arc<PasswordHasher>, jwt: Arc<JwtCodec>) -> Self {
        Self { repo, hasher, jwt }
    }

    /// Register a new account and issue its first access token.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<IssuedToken> {
        if self
            .repo
            .find_by_username_or_email(username, email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Username or email already registered"));
        }

        let credential_hash = self.hasher.hash_password(password)?;
        let user = self
            .repo
            .create(&CreateUser {
                username: username.to_string(),
                email: email.to_string(),
                credential_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "Account registered");
        self.issue(&user)
    }

    /// Authenticate an account and issue an access token.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<IssuedToken> {
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

        if !self.hasher.verify_password(password, &user.credential_hash)? {
            return Err(AppError::unauthorized("Invalid username or password"));
        }

        if !user.is_active {
            return Err(AppError::forbidden("User account is disabled"));
        }

        info!(user_id = %user.id, "Account logged in");
        self.issue(&user)
    }

    /// Resolve a bearer token to its account.
    pub async fn me(&self, access_token: &str) -> AppResult<User> {
        let claims = self.jwt.verify(access_token)?;
        self.repo
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    fn issue(&self, user: &User) -> AppResult<IssuedToken> {
        Ok(IssuedToken {
            access_token: self.jwt.issue(user.id)?,
            token_type: "bearer".to_string(),
            user_id: user.id.to_string(),
        })
    }
}
