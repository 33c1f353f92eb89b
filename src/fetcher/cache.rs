//! # Grid Cache
//!
//! Fetched grids keyed by (spreadsheet, tab). Several endpoints with
//! different cache durations can share one entry, so freshness is judged
//! against the reading caller's TTL, never the writer's. Only successful
//! fetches are ever stored.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::sheet::Grid;

/// Entry count above which expired entries are purged on insert
pub const PURGE_THRESHOLD: usize = 1_024;

/// Cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub spreadsheet: String,
    pub tab: String,
}

impl CacheKey {
    pub fn new(spreadsheet: impl Into<String>, tab: impl Into<String>) -> Self {
        Self {
            spreadsheet: spreadsheet.into(),
            tab: tab.into(),
        }
    }
}

/// Cached grid
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub grid: Arc<Grid>,
    pub fetched_at: Instant,
    /// No reader can still consider the entry fresh after this instant
    pub retain_until: Instant,
}

impl CacheEntry {
    pub fn new(grid: Arc<Grid>, fetched_at: Instant, ttl: Duration) -> Self {
        Self {
            grid,
            fetched_at,
            retain_until: fetched_at.checked_add(ttl).unwrap_or(fetched_at),
        }
    }

    /// Fresh for a caller whose cache duration is `ttl`
    pub fn is_fresh_for(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.retain_until
    }
}

/// Storage for fetched grids
pub trait GridCache: Send + Sync + Debug {
    /// Entry for `key` that is fresh under `ttl`, if any
    fn get(&self, key: &CacheKey, now: Instant, ttl: Duration) -> Option<CacheEntry>;

    /// Store an entry. Retention is the longest of the new and replaced entry.
    fn put(&self, key: CacheKey, entry: CacheEntry);

    /// Drop entries no reader can use; returns the number dropped
    fn purge_expired(&self, now: Instant) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process grid cache.
///
/// Entries hold plain data, so a poisoned lock is recovered rather than
/// propagated.
#[derive(Debug, Default)]
pub struct MemGridCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl MemGridCache {
    pub fn new() -> Self {
        Self::default()
    }
}

fn purge(entries: &mut HashMap<CacheKey, CacheEntry>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, e| !e.is_expired(now));
    before - entries.len()
}

impl GridCache for MemGridCache {
    fn get(&self, key: &CacheKey, now: Instant, ttl: Duration) -> Option<CacheEntry> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).filter(|e| e.is_fresh_for(now, ttl)).cloned()
    }

    fn put(&self, key: CacheKey, mut entry: CacheEntry) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.len() >= PURGE_THRESHOLD {
            purge(&mut entries, entry.fetched_at);
        }
        if let Some(previous) = entries.get(&key) {
            entry.retain_until = entry.retain_until.max(previous.retain_until);
        }
        entries.insert(key, entry);
    }

    fn purge_expired(&self, now: Instant) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        purge(&mut entries, now)
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Arc<Grid> {
        Arc::new(vec![vec!["A".to_string()]])
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_fresh_entry_is_returned() {
        let cache = MemGridCache::new();
        let now = Instant::now();
        cache.put(CacheKey::new("s", "t"), CacheEntry::new(grid(), now, secs(60)));

        assert!(cache.get(&CacheKey::new("s", "t"), now, secs(60)).is_some());
        assert!(cache.get(&CacheKey::new("s", "other"), now, secs(60)).is_none());
    }

    #[test]
    fn test_expired_entry_is_miss() {
        let cache = MemGridCache::new();
        let now = Instant::now();
        cache.put(CacheKey::new("s", "t"), CacheEntry::new(grid(), now, secs(5)));

        assert!(cache.get(&CacheKey::new("s", "t"), now + secs(5), secs(5)).is_none());
        assert_eq!(cache.purge_expired(now + secs(6)), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_freshness_follows_reader_ttl() {
        let cache = MemGridCache::new();
        let key = CacheKey::new("s", "t");
        let now = Instant::now();
        cache.put(key.clone(), CacheEntry::new(grid(), now, secs(86_400)));

        let later = now + Duration::from_millis(1_100);
        assert!(cache.get(&key, later, secs(1)).is_none());
        assert!(cache.get(&key, later, secs(86_400)).is_some());
    }

    #[test]
    fn test_short_write_keeps_long_retention() {
        let cache = MemGridCache::new();
        let key = CacheKey::new("s", "t");
        let now = Instant::now();
        cache.put(key.clone(), CacheEntry::new(grid(), now, secs(600)));
        cache.put(key.clone(), CacheEntry::new(grid(), now + secs(2), secs(1)));

        assert_eq!(cache.purge_expired(now + secs(10)), 0);
        assert!(cache.get(&key, now + secs(10), secs(600)).is_some());
    }

    #[test]
    fn test_insert_above_threshold_purges_expired() {
        let cache = MemGridCache::new();
        let now = Instant::now();
        for i in 0..PURGE_THRESHOLD {
            cache.put(CacheKey::new("s", format!("tab-{}", i)), CacheEntry::new(grid(), now, secs(1)));
        }
        assert_eq!(cache.len(), PURGE_THRESHOLD);

        cache.put(CacheKey::new("s", "new"), CacheEntry::new(grid(), now + secs(2), secs(60)));
        assert_eq!(cache.len(), 1);
    }
}
