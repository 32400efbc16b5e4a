//! Login and registration flows against the object store.
//!
//! After either flow succeeds, every file uploaded under the session's
//! prior (usually ephemeral) identity is claimed for the account via
//! the ownership-transfer endpoint. A failed transfer must not fail the
//! authentication: the session proceeds logged in and the failure is
//! logged for follow-up, distinctly from any authentication error.

use std::sync::Arc;

use tracing::{info, warn};

use fileshare_core::result::AppResult;
use fileshare_core::types::OwnerId;

use crate::client::{FileServiceClient, IssuedToken};

/// Orchestrates authentication plus the ownership claim.
#[derive(Debug, Clone)]
pub struct AuthFlow {
    /// Object-store client.
    client: Arc<FileServiceClient>,
}

impl AuthFlow {
    /// Creates a new auth flow.
    pub fn new(client: Arc<FileServiceClient>) -> Self {
        Self { client }
    }

    /// Authenticate an existing account and claim the session's uploads.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        prior_identity: &OwnerId,
    ) -> AppResult<IssuedToken> {
        let issued = self.client.login(username, password).await?;
        self.claim_uploads(prior_identity, &issued).await;
        Ok(issued)
    }

    /// Register a new account and claim the session's uploads.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        prior_identity: &OwnerId,
    ) -> AppResult<IssuedToken> {
        let issued = self.client.register(username, email, password).await?;
        self.claim_uploads(prior_identity, &issued).await;
        Ok(issued)
    }

    /// Transfer files from the prior identity to the account. Runs on
    /// every successful login/registration, even when the session never
    /// uploaded anything; an empty transfer reports zero and succeeds.
    async fn claim_uploads(&self, prior_identity: &OwnerId, issued: &IssuedToken) {
        let old_owner = prior_identity.to_wire();
        if old_owner == issued.user_id {
            return;
        }

        match self
            .client
            .transfer_files(&old_owner, &issued.user_id)
            .await
        {
            Ok(outcome) => {
                info!(
                    old_owner,
                    new_owner = %issued.user_id,
                    count = outcome.count,
                    "Claimed session uploads for account"
                );
            }
            Err(e) => {
                // Non-fatal: the login itself succeeded. The files stay
                // under the ephemeral id until a later login claims them.
                warn!(
                    old_owner,
                    new_owner = %issued.user_id,
                    error = %e,
                    "Ownership transfer failed after authentication"
                );
            }
        }
    }
}
