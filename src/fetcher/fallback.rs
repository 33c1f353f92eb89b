//! Explicit sample substitution.
//!
//! Only callers that hold a `SampleFallback` ever see sample rows in place of
//! a failed fetch, and every substitution is logged and counted.

use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::sheet::{sample_grid, Grid};

use super::errors::FetchResult;
use super::fetcher::FetchedGrid;

/// What a fallback-wrapped fetch resolved to
#[derive(Debug, Clone)]
pub enum Served {
    Live(FetchedGrid),
    Sample(Arc<Grid>),
}

#[derive(Debug, Clone)]
pub struct SampleFallback {
    enabled: bool,
    sample: Arc<Grid>,
    metrics: Arc<MetricsRegistry>,
}

impl SampleFallback {
    pub fn new(enabled: bool, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            enabled,
            sample: Arc::new(sample_grid()),
            metrics,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The sample dataset
    pub fn sample(&self) -> Arc<Grid> {
        Arc::clone(&self.sample)
    }

    /// Replace a failed fetch with the sample dataset when enabled;
    /// otherwise the error passes through unchanged
    pub fn recover(&self, result: FetchResult<FetchedGrid>, endpoint: &str) -> FetchResult<Served> {
        match result {
            Ok(fetched) => Ok(Served::Live(fetched)),
            Err(e) if self.enabled => {
                self.metrics.increment_sample_fallbacks();
                let message = e.to_string();
                log_event_with_fields(
                    Event::SampleFallback,
                    &[
                        ("endpoint", endpoint),
                        ("error", message.as_str()),
                        ("kind", e.kind()),
                    ],
                );
                Ok(Served::Sample(self.sample()))
            }
            Err(e) => Err(e),
        }
    }
}
