//! WAQI client configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the WAQI feed client.
///
/// The API token is injected here once at startup; the client never reads it
/// from the process environment itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaqiConfig {
    /// Feed API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API token (required for any fetch)
    pub token: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.waqi.info".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for WaqiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}
