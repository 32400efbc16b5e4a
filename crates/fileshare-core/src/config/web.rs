//! Browser-facing web service configuration.

use serde::{Deserialize, Serialize};

/// Settings for the web collaborator process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Base URL of the object-store service.
    #[serde(default = "default_file_service_url")]
    pub file_service_url: String,
    /// Maximum upload size accepted from browsers, in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Request timeout for upstream calls, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            file_service_url: default_file_service_url(),
            max_upload_size_bytes: default_max_upload(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_file_service_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_max_upload() -> u64 {
    1024 * 1024 * 1024
}

fn default_request_timeout() -> u64 {
    60
}
