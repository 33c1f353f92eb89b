//! # Endpoint Registry
//!
//! Maps opaque endpoint ids to their configs. Storage is injected, so a
//! persistent store can replace the in-memory one without touching callers.

use std::sync::Arc;

use chrono::{Duration, Utc};

use super::endpoint::{generate_endpoint_id, EndpointConfig, PartialConfig, StoredEndpoint};
use super::errors::{RegistryError, RegistryResult};
use super::store::{ConfigStore, MemConfigStore};

/// Attempts at drawing an unused id before giving up
const MAX_ID_ATTEMPTS: usize = 8;

/// Registry of generated endpoints
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    store: Arc<dyn ConfigStore>,
}

impl EndpointRegistry {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Registry backed by an in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemConfigStore::new()))
    }

    /// Validate, assign a fresh id and persist a new endpoint
    pub fn create(&self, partial: PartialConfig) -> RegistryResult<EndpointConfig> {
        let id = self.fresh_id()?;
        let config = partial.into_config(id, Utc::now())?;
        self.store.put(StoredEndpoint::new(config.clone()))?;
        Ok(config)
    }

    fn fresh_id(&self) -> RegistryResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = generate_endpoint_id();
            if !self.store.is_known(&id)? {
                return Ok(id);
            }
        }
        Err(RegistryError::Internal("Could not allocate an unused endpoint id".into()))
    }

    /// Get an endpoint config
    pub fn get(&self, id: &str) -> RegistryResult<EndpointConfig> {
        self.stored(id).map(|e| e.config)
    }

    /// Get an endpoint config together with its usage counters
    pub fn stored(&self, id: &str) -> RegistryResult<StoredEndpoint> {
        self.store
            .get(id)?
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Delete an endpoint. Deleting an absent id returns `false`.
    pub fn delete(&self, id: &str) -> RegistryResult<bool> {
        self.store.remove(id)
    }

    /// Record an access. Observability only; never used for authorization.
    pub fn touch(&self, id: &str) -> RegistryResult<()> {
        if self.store.record_access(id, Utc::now())? {
            Ok(())
        } else {
            Err(RegistryError::NotFound(id.to_string()))
        }
    }

    /// Remove endpoints idle for more than `older_than_days`; returns the count removed
    pub fn sweep(&self, older_than_days: u32) -> RegistryResult<usize> {
        let cutoff = Utc::now() - Duration::days(i64::from(older_than_days));
        Ok(self.store.sweep(cutoff)?.len())
    }

    /// All endpoints, oldest first
    pub fn list(&self) -> RegistryResult<Vec<EndpointConfig>> {
        let mut configs: Vec<EndpointConfig> =
            self.store.list()?.into_iter().map(|e| e.config).collect();
        configs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(configs)
    }

    /// Number of live endpoints
    pub fn len(&self) -> RegistryResult<usize> {
        Ok(self.store.list()?.len())
    }

    pub fn is_empty(&self) -> RegistryResult<bool> {
        Ok(self.len()? == 0)
    }
}
