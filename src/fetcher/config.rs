//! Provider Configuration
//!
//! Where the spreadsheet provider lives and how to authenticate against it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Longest upstream timeout accepted
pub const MAX_TIMEOUT_SECS: u64 = 120;

/// Spreadsheet provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API root (default: "https://sheets.googleapis.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key for public spreadsheets
    #[serde(default)]
    pub api_key: Option<String>,

    /// OAuth client id, used when no API key is configured
    #[serde(default)]
    pub oauth_client_id: Option<String>,

    #[serde(default)]
    pub oauth_client_secret: Option<String>,

    /// Per-call timeout (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            oauth_client_id: None,
            oauth_client_secret: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// True when any credential is configured
    pub fn has_credentials(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
            || (self.oauth_client_id.is_some() && self.oauth_client_secret.is_some())
    }

    /// Check bounds; returns a description of the first problem found
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(format!(
                "provider.timeout_secs must be between 1 and {}, got {}",
                MAX_TIMEOUT_SECS, self.timeout_secs
            ));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!("provider.base_url must be an http(s) URL, got '{}'", self.base_url));
        }
        Ok(())
    }
}
