//! # Endpoint Definitions

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::fetcher::reference::normalize_spreadsheet_ref;
use crate::sheet::{Capabilities, SourceInfo};

use super::errors::{RegistryError, RegistryResult};

/// Upper bound for `cacheDurationSeconds` (one day)
pub const MAX_CACHE_DURATION_SECS: i64 = 86_400;

/// Cache duration used when the request does not specify one
pub const DEFAULT_CACHE_DURATION_SECS: u32 = 300;

/// Random bytes per endpoint id (192 bits)
const ID_BYTES: usize = 24;

/// A generated API: which tab it serves and which features it exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    /// Opaque, unguessable identifier
    pub id: String,
    /// Normalized spreadsheet id
    pub spreadsheet_ref: String,
    pub tab_name: String,
    pub display_name: String,
    pub enable_filters: bool,
    pub enable_pagination: bool,
    pub cache_duration_seconds: u32,
    pub created_at: DateTime<Utc>,
}

impl EndpointConfig {
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::new(self.enable_filters, self.enable_pagination)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.cache_duration_seconds))
    }

    pub fn source_info(&self) -> SourceInfo {
        SourceInfo::spreadsheet(
            Some(self.id.clone()),
            self.display_name.clone(),
            self.spreadsheet_ref.clone(),
            self.tab_name.clone(),
        )
    }
}

/// Client-supplied fields for a new endpoint.
///
/// Every field is optional at the wire level so that missing fields surface
/// as validation errors instead of body rejections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
    pub spreadsheet_ref: Option<String>,
    pub tab_name: Option<String>,
    pub display_name: Option<String>,
    pub enable_filters: Option<bool>,
    pub enable_pagination: Option<bool>,
    pub cache_duration_seconds: Option<i64>,
}

impl PartialConfig {
    pub fn new(
        spreadsheet_ref: impl Into<String>,
        tab_name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            spreadsheet_ref: Some(spreadsheet_ref.into()),
            tab_name: Some(tab_name.into()),
            display_name: Some(display_name.into()),
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, enabled: bool) -> Self {
        self.enable_filters = Some(enabled);
        self
    }

    pub fn with_pagination(mut self, enabled: bool) -> Self {
        self.enable_pagination = Some(enabled);
        self
    }

    pub fn with_cache_duration(mut self, secs: i64) -> Self {
        self.cache_duration_seconds = Some(secs);
        self
    }

    /// Validate and fill defaults, producing a config with the given id
    pub fn into_config(self, id: String, created_at: DateTime<Utc>) -> RegistryResult<EndpointConfig> {
        let raw_ref = required(self.spreadsheet_ref, "spreadsheetRef")?;
        let spreadsheet_ref = normalize_spreadsheet_ref(&raw_ref).ok_or_else(|| {
            RegistryError::InvalidConfig(format!("spreadsheetRef is not a spreadsheet id or URL: {}", raw_ref))
        })?;

        let cache_duration_seconds = match self.cache_duration_seconds {
            None => DEFAULT_CACHE_DURATION_SECS,
            Some(secs) if (0..=MAX_CACHE_DURATION_SECS).contains(&secs) => secs as u32,
            Some(secs) => {
                return Err(RegistryError::InvalidConfig(format!(
                    "cacheDurationSeconds must be between 0 and {}, got {}",
                    MAX_CACHE_DURATION_SECS, secs
                )))
            }
        };

        Ok(EndpointConfig {
            id,
            spreadsheet_ref,
            tab_name: required(self.tab_name, "tabName")?,
            display_name: required(self.display_name, "displayName")?,
            enable_filters: self.enable_filters.unwrap_or(false),
            enable_pagination: self.enable_pagination.unwrap_or(false),
            cache_duration_seconds,
            created_at,
        })
    }
}

fn required(value: Option<String>, field: &str) -> RegistryResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(RegistryError::InvalidConfig(format!("{} is required", field))),
    }
}

/// Access counters maintained by the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub access_count: u64,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

/// A config together with its usage counters, as held by a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEndpoint {
    pub config: EndpointConfig,
    #[serde(default)]
    pub usage: UsageStats,
}

impl StoredEndpoint {
    pub fn new(config: EndpointConfig) -> Self {
        Self {
            config,
            usage: UsageStats::default(),
        }
    }

    /// Last access, or creation time for never-used endpoints
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.usage.last_accessed_at.unwrap_or(self.config.created_at)
    }

    pub fn record_access(&mut self, at: DateTime<Utc>) {
        self.usage.access_count += 1;
        self.usage.last_accessed_at = Some(at);
    }
}

/// Generate a fresh endpoint id from the OS random source
pub fn generate_endpoint_id() -> String {
    let mut bytes = [0u8; ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
