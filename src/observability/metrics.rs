//! Service counters
//!
//! Counters only, monotonic, reset on process start. Atomic with Relaxed
//! ordering; exactness across threads is not required.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    requests_served: AtomicU64,
    requests_failed: AtomicU64,
    rate_limited: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    upstream_calls: AtomicU64,
    upstream_errors: AtomicU64,
    sample_fallbacks: AtomicU64,
    endpoints_created: AtomicU64,
    endpoints_deleted: AtomicU64,
    endpoints_swept: AtomicU64,
    access_record_failures: AtomicU64,
}

/// Point-in-time copy of every counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests_served: u64,
    pub requests_failed: u64,
    pub rate_limited: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub upstream_calls: u64,
    pub upstream_errors: u64,
    pub sample_fallbacks: u64,
    pub endpoints_created: u64,
    pub endpoints_deleted: u64,
    pub endpoints_swept: u64,
    pub access_record_failures: u64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self, success: bool) {
        if success {
            self.requests_served.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_hits(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_misses(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_upstream_calls(&self) {
        self.upstream_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_upstream_errors(&self) {
        self.upstream_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sample_fallbacks(&self) {
        self.sample_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_endpoints_created(&self) {
        self.endpoints_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_endpoints_deleted(&self) {
        self.endpoints_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_endpoints_swept(&self, count: u64) {
        self.endpoints_swept.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_access_record_failures(&self) {
        self.access_record_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn upstream_calls(&self) -> u64 {
        self.upstream_calls.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_served: self.requests_served.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            upstream_calls: self.upstream_calls.load(Ordering::Relaxed),
            upstream_errors: self.upstream_errors.load(Ordering::Relaxed),
            sample_fallbacks: self.sample_fallbacks.load(Ordering::Relaxed),
            endpoints_created: self.endpoints_created.load(Ordering::Relaxed),
            endpoints_deleted: self.endpoints_deleted.load(Ordering::Relaxed),
            endpoints_swept: self.endpoints_swept.load(Ordering::Relaxed),
            access_record_failures: self.access_record_failures.load(Ordering::Relaxed),
        }
    }
}
