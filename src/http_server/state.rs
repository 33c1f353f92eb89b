//! Shared state for HTTP handlers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::fetcher::{SampleFallback, SheetFetcher, SheetProvider};
use crate::observability::MetricsRegistry;
use crate::registry::{EndpointConfig, EndpointRegistry};

use super::config::HttpServerConfig;
use super::rate_limit::{RateLimitConfig, RateLimiter};

/// Id reported for the configured default endpoint
pub const DEFAULT_ENDPOINT_ID: &str = "default";

/// Everything the HTTP layer needs from configuration
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub server: HttpServerConfig,
    pub rate_limit: RateLimitConfig,
    /// TTL for ad-hoc sheet requests
    pub default_cache_ttl_secs: u32,
    /// Endpoint served at `/api/data`; sample data when absent
    pub default_endpoint: Option<EndpointConfig>,
    /// Substitute sample rows when the default endpoint fails
    pub fallback_to_sample: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            rate_limit: RateLimitConfig::default(),
            default_cache_ttl_secs: 300,
            default_endpoint: None,
            fallback_to_sample: true,
        }
    }
}

impl ApiSettings {
    pub fn default_cache_ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.default_cache_ttl_secs))
    }
}

/// State shared across handlers
#[derive(Debug)]
pub struct AppState {
    pub settings: ApiSettings,
    pub registry: EndpointRegistry,
    pub fetcher: SheetFetcher,
    pub fallback: SampleFallback,
    pub rate_limiter: RateLimiter,
    pub metrics: Arc<MetricsRegistry>,
    started_at: Instant,
    default_rows: AtomicUsize,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        settings: ApiSettings,
        registry: EndpointRegistry,
        provider: Arc<dyn SheetProvider>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            fetcher: SheetFetcher::with_mem_cache(provider, Arc::clone(&metrics)),
            fallback: SampleFallback::new(settings.fallback_to_sample, Arc::clone(&metrics)),
            rate_limiter: RateLimiter::new(settings.rate_limit.clone()),
            settings,
            registry,
            metrics,
            started_at: Instant::now(),
            default_rows: AtomicUsize::new(0),
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Row count of the last grid served for the default endpoint
    pub fn default_rows(&self) -> usize {
        self.default_rows.load(Ordering::Relaxed)
    }

    pub(crate) fn set_default_rows(&self, rows: usize) {
        self.default_rows.store(rows, Ordering::Relaxed);
    }

    /// Data route URL for an endpoint id
    pub fn endpoint_url(&self, id: &str) -> String {
        format!("{}/api/apis/{}/data", self.settings.server.base_url(), id)
    }
}
