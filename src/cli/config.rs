//! Service configuration file
//!
//! One JSON document, every field defaulted. Environment variables override
//! file values after load; validation runs last.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::fetcher::ProviderConfig;
use crate::http_server::{ApiSettings, HttpServerConfig, RateLimitConfig, DEFAULT_ENDPOINT_ID};
use crate::observability::Severity;
use crate::registry::{EndpointConfig, PartialConfig, SweepSchedule};

use super::errors::{CliError, CliResult};

/// Grid cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL for ad-hoc sheet requests (default: 300)
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u32,
}

fn default_ttl_secs() -> u32 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl_secs(),
        }
    }
}

/// Endpoint registry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// JSON file holding generated APIs; in-memory when unset
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    /// Idle days before a generated API is swept (default: 30)
    #[serde(default = "default_sweep_after_days")]
    pub sweep_after_days: u32,

    /// Cron expression for the periodic sweep (default: daily at 03:00)
    #[serde(default = "default_sweep_cron")]
    pub sweep_cron: String,
}

fn default_sweep_after_days() -> u32 {
    30
}

fn default_sweep_cron() -> String {
    "0 3 * * *".to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            sweep_after_days: default_sweep_after_days(),
            sweep_cron: default_sweep_cron(),
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    /// Endpoint served at `/api/data`
    #[serde(default)]
    pub default_endpoint: Option<PartialConfig>,

    /// Serve sample rows when the default endpoint fails (default: true)
    #[serde(default = "default_fallback_to_sample")]
    pub fallback_to_sample: bool,

    /// Minimum log severity (default: "INFO")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_fallback_to_sample() -> bool {
    true
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            provider: ProviderConfig::default(),
            cache: CacheConfig::default(),
            rate_limit: RateLimitConfig::default(),
            registry: RegistryConfig::default(),
            default_endpoint: None,
            fallback_to_sample: default_fallback_to_sample(),
            log_level: default_log_level(),
        }
    }
}

impl ServiceConfig {
    /// Load, apply environment overrides and validate.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration file without overrides or validation
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Apply overrides from `lookup`: `SHEETAPI_PORT` (or `PORT`),
    /// `GOOGLE_API_KEY`, `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`
    pub fn apply_env<F>(&mut self, lookup: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("SHEETAPI_PORT").or_else(|| lookup("PORT")) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| CliError::config_error(format!("Invalid port override: '{}'", port)))?;
        }
        if let Some(key) = lookup("GOOGLE_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Some(id) = lookup("GOOGLE_CLIENT_ID") {
            self.provider.oauth_client_id = Some(id);
        }
        if let Some(secret) = lookup("GOOGLE_CLIENT_SECRET") {
            self.provider.oauth_client_secret = Some(secret);
        }
        Ok(())
    }

    /// Validate every section
    pub fn validate(&self) -> CliResult<()> {
        if self.server.port == 0 {
            return Err(CliError::config_error("server.port must be > 0"));
        }

        self.provider.validate().map_err(CliError::config_error)?;

        if self.rate_limit.max_requests == 0 {
            return Err(CliError::config_error("rate_limit.max_requests must be > 0"));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(CliError::config_error("rate_limit.window_secs must be > 0"));
        }

        self.sweep_schedule()?;
        self.severity()?;
        self.default_endpoint_config()?;

        Ok(())
    }

    pub fn sweep_schedule(&self) -> CliResult<SweepSchedule> {
        Ok(SweepSchedule::parse(&self.registry.sweep_cron)?)
    }

    pub fn severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_level)
            .ok_or_else(|| CliError::config_error(format!("Invalid log_level: '{}'", self.log_level)))
    }

    /// The configured default endpoint, validated like a created one
    pub fn default_endpoint_config(&self) -> CliResult<Option<EndpointConfig>> {
        self.default_endpoint
            .clone()
            .map(|partial| {
                partial
                    .into_config(DEFAULT_ENDPOINT_ID.to_string(), Utc::now())
                    .map_err(|e| CliError::config_error(format!("default_endpoint: {}", e)))
            })
            .transpose()
    }

    /// Settings for the HTTP layer
    pub fn api_settings(&self) -> CliResult<ApiSettings> {
        Ok(ApiSettings {
            server: self.server.clone(),
            rate_limit: self.rate_limit.clone(),
            default_cache_ttl_secs: self.cache.default_ttl_secs,
            default_endpoint: self.default_endpoint_config()?,
            fallback_to_sample: self.fallback_to_sample,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cache.default_ttl_secs, 300);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window_secs, 900);
        assert_eq!(config.registry.sweep_after_days, 30);
        assert!(config.fallback_to_sample);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file() {
        let config: ServiceConfig = serde_json::from_str(
            r#"{
                "server": {"port": 8080},
                "default_endpoint": {"spreadsheetRef": "abc", "tabName": "Staff", "displayName": "People"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        let default = config.default_endpoint_config().unwrap().unwrap();
        assert_eq!(default.id, "default");
        assert_eq!(default.cache_duration_seconds, 300);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServiceConfig::default();
        config
            .apply_env(env(&[("PORT", "4000"), ("GOOGLE_API_KEY", "k")]))
            .unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.provider.api_key.as_deref(), Some("k"));

        config
            .apply_env(env(&[("SHEETAPI_PORT", "5000"), ("PORT", "4001")]))
            .unwrap();
        assert_eq!(config.server.port, 5000);

        assert!(config.apply_env(env(&[("PORT", "nope")])).is_err());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = ServiceConfig::default();
        config.registry.sweep_cron = "every day".into();
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.log_level = "LOUD".into();
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.rate_limit.max_requests = 0;
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.default_endpoint = Some(PartialConfig::new("abc", "Staff", "People").with_cache_duration(90_000));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.registry, RegistryConfig::default());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheetapi.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(ServiceConfig::load(&path).is_err());
    }
}
