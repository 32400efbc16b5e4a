//! Application state for the web service.

use std::sync::Arc;
use std::time::Duration;

use fileshare_core::config::WebAppConfig;
use fileshare_core::result::AppResult;

use crate::auth_flow::AuthFlow;
use crate::client::FileServiceClient;

/// Shared dependencies of the browser-facing service.
#[derive(Debug, Clone)]
pub struct WebState {
    /// Web service configuration.
    pub config: Arc<WebAppConfig>,
    /// Object-store client.
    pub client: Arc<FileServiceClient>,
    /// Login/registration flow.
    pub auth: AuthFlow,
}

impl WebState {
    /// Wire up the client and flows from configuration.
    pub fn build(config: WebAppConfig) -> AppResult<Self> {
        let client = Arc::new(FileServiceClient::new(
            &config.web.file_service_url,
            Duration::from_secs(config.web.request_timeout_seconds),
        )?);

        Ok(Self {
            config: Arc::new(config),
            auth: AuthFlow::new(client.clone()),
            client,
        })
    }
}
