//! # Sheet Fetcher
//!
//! Cache-then-provider retrieval of one tab's grid. Provider failures are
//! normalized into `FetchError` and never cached.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::sheet::Grid;

use super::cache::{CacheEntry, CacheKey, GridCache, MemGridCache};
use super::errors::{FetchError, FetchResult};
use super::provider::{SheetProvider, SpreadsheetMeta};
use super::reference::normalize_spreadsheet_ref;

/// A grid together with whether it came from the cache
#[derive(Debug, Clone)]
pub struct FetchedGrid {
    pub grid: Arc<Grid>,
    pub cached: bool,
}

/// Retrieves grids through the cache
#[derive(Clone)]
pub struct SheetFetcher {
    provider: Arc<dyn SheetProvider>,
    cache: Arc<dyn GridCache>,
    metrics: Arc<MetricsRegistry>,
}

impl fmt::Debug for SheetFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetFetcher")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl SheetFetcher {
    pub fn new(
        provider: Arc<dyn SheetProvider>,
        cache: Arc<dyn GridCache>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            provider,
            cache,
            metrics,
        }
    }

    /// Fetcher with a fresh in-process cache
    pub fn with_mem_cache(provider: Arc<dyn SheetProvider>, metrics: Arc<MetricsRegistry>) -> Self {
        Self::new(provider, Arc::new(MemGridCache::new()), metrics)
    }

    pub fn cache(&self) -> &Arc<dyn GridCache> {
        &self.cache
    }

    /// Fetch the grid of one tab.
    ///
    /// An entry fetched less than `ttl` ago is returned without contacting
    /// the provider, whoever wrote it. A zero `ttl` bypasses the cache in
    /// both directions.
    pub async fn fetch_grid(
        &self,
        spreadsheet_ref: &str,
        tab: &str,
        ttl: Duration,
    ) -> FetchResult<FetchedGrid> {
        let spreadsheet_id = resolve_ref(spreadsheet_ref)?;
        let key = CacheKey::new(spreadsheet_id.as_str(), tab);
        let use_cache = !ttl.is_zero();

        if use_cache {
            if let Some(entry) = self.cache.get(&key, Instant::now(), ttl) {
                self.metrics.increment_cache_hits();
                log_event_with_fields(
                    Event::CacheHit,
                    &[("spreadsheet", spreadsheet_id.as_str()), ("tab", tab)],
                );
                return Ok(FetchedGrid {
                    grid: entry.grid,
                    cached: true,
                });
            }
            self.metrics.increment_cache_misses();
            log_event_with_fields(
                Event::CacheMiss,
                &[("spreadsheet", spreadsheet_id.as_str()), ("tab", tab)],
            );
        }

        self.metrics.increment_upstream_calls();
        let grid = match self.provider.values(&spreadsheet_id, tab).await {
            Ok(grid) => Arc::new(grid),
            Err(e) => return Err(self.upstream_failure(&spreadsheet_id, e.into())),
        };

        if use_cache {
            self.cache
                .put(key, CacheEntry::new(Arc::clone(&grid), Instant::now(), ttl));
        }

        Ok(FetchedGrid {
            grid,
            cached: false,
        })
    }

    /// Fetch spreadsheet title and tabs. Never cached.
    pub async fn fetch_metadata(&self, spreadsheet_ref: &str) -> FetchResult<SpreadsheetMeta> {
        let spreadsheet_id = resolve_ref(spreadsheet_ref)?;

        self.metrics.increment_upstream_calls();
        self.provider
            .metadata(&spreadsheet_id)
            .await
            .map_err(|e| self.upstream_failure(&spreadsheet_id, e.into()))
    }

    fn upstream_failure(&self, spreadsheet_id: &str, err: FetchError) -> FetchError {
        self.metrics.increment_upstream_errors();
        let message = err.to_string();
        log_event_with_fields(
            Event::UpstreamError,
            &[
                ("error", message.as_str()),
                ("kind", err.kind()),
                ("spreadsheet", spreadsheet_id),
            ],
        );
        err
    }
}

fn resolve_ref(spreadsheet_ref: &str) -> FetchResult<String> {
    normalize_spreadsheet_ref(spreadsheet_ref).ok_or_else(|| {
        FetchError::SheetNotFound(format!("Invalid spreadsheet reference '{}'", spreadsheet_ref))
    })
}
