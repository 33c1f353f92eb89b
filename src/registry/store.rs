//! # Endpoint Config Store
//!
//! Storage behind the registry. A store holds live endpoints and remembers
//! every id it has ever removed so ids are never handed out twice.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::endpoint::StoredEndpoint;
use super::errors::{RegistryError, RegistryResult};

/// Trait for endpoint config storage
pub trait ConfigStore: Send + Sync + std::fmt::Debug {
    /// Get a live endpoint
    fn get(&self, id: &str) -> RegistryResult<Option<StoredEndpoint>>;

    /// Insert or replace an endpoint
    fn put(&self, entry: StoredEndpoint) -> RegistryResult<()>;

    /// Remove an endpoint; returns whether it was present
    fn remove(&self, id: &str) -> RegistryResult<bool>;

    /// All live endpoints, in no particular order
    fn list(&self) -> RegistryResult<Vec<StoredEndpoint>>;

    /// Bump the access counter; returns whether the endpoint exists
    fn record_access(&self, id: &str, at: DateTime<Utc>) -> RegistryResult<bool>;

    /// Remove every endpoint whose last activity is before `cutoff`; returns removed ids
    fn sweep(&self, cutoff: DateTime<Utc>) -> RegistryResult<Vec<String>>;

    /// Whether the id is live or was ever removed
    fn is_known(&self, id: &str) -> RegistryResult<bool>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    endpoints: HashMap<String, StoredEndpoint>,
    #[serde(default)]
    retired: HashSet<String>,
}

impl StoreState {
    fn remove(&mut self, id: &str) -> bool {
        let removed = self.endpoints.remove(id).is_some();
        if removed {
            self.retired.insert(id.to_string());
        }
        removed
    }

    fn sweep(&mut self, cutoff: DateTime<Utc>) -> Vec<String> {
        let stale: Vec<String> = self
            .endpoints
            .values()
            .filter(|e| e.last_activity() < cutoff)
            .map(|e| e.config.id.clone())
            .collect();
        for id in &stale {
            self.remove(id);
        }
        stale
    }

    fn record_access(&mut self, id: &str, at: DateTime<Utc>) -> bool {
        match self.endpoints.get_mut(id) {
            Some(entry) => {
                entry.record_access(at);
                true
            }
            None => false,
        }
    }

    fn is_known(&self, id: &str) -> bool {
        self.endpoints.contains_key(id) || self.retired.contains(id)
    }
}

/// In-memory config store
#[derive(Debug, Default)]
pub struct MemConfigStore {
    state: RwLock<StoreState>,
}

impl MemConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemConfigStore {
    fn get(&self, id: &str) -> RegistryResult<Option<StoredEndpoint>> {
        let state = self.state.read().map_err(|_| RegistryError::poisoned())?;
        Ok(state.endpoints.get(id).cloned())
    }

    fn put(&self, entry: StoredEndpoint) -> RegistryResult<()> {
        let mut state = self.state.write().map_err(|_| RegistryError::poisoned())?;
        state.endpoints.insert(entry.config.id.clone(), entry);
        Ok(())
    }

    fn remove(&self, id: &str) -> RegistryResult<bool> {
        let mut state = self.state.write().map_err(|_| RegistryError::poisoned())?;
        Ok(state.remove(id))
    }

    fn list(&self) -> RegistryResult<Vec<StoredEndpoint>> {
        let state = self.state.read().map_err(|_| RegistryError::poisoned())?;
        Ok(state.endpoints.values().cloned().collect())
    }

    fn record_access(&self, id: &str, at: DateTime<Utc>) -> RegistryResult<bool> {
        let mut state = self.state.write().map_err(|_| RegistryError::poisoned())?;
        Ok(state.record_access(id, at))
    }

    fn sweep(&self, cutoff: DateTime<Utc>) -> RegistryResult<Vec<String>> {
        let mut state = self.state.write().map_err(|_| RegistryError::poisoned())?;
        Ok(state.sweep(cutoff))
    }

    fn is_known(&self, id: &str) -> RegistryResult<bool> {
        let state = self.state.read().map_err(|_| RegistryError::poisoned())?;
        Ok(state.is_known(id))
    }
}

/// JSON file-backed config store.
///
/// The whole state is held in memory and rewritten to disk after every
/// change (write to a sibling temp file, then rename). A change becomes
/// visible only once it is on disk; a failed write leaves the store as it was.
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl FileConfigStore {
    /// Open the store, loading existing state if the file exists
    pub fn open(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref().to_path_buf();
        let state = Self::load_state(&path)?;
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_state(path: &Path) -> RegistryResult<StoreState> {
        if !path.exists() {
            return Ok(StoreState::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| RegistryError::Storage(format!("Failed to read config store: {}", e)))?;

        if content.trim().is_empty() {
            return Ok(StoreState::default());
        }

        serde_json::from_str(&content)
            .map_err(|e| RegistryError::Storage(format!("Failed to parse config store: {}", e)))
    }

    fn save_state(&self, state: &StoreState) -> RegistryResult<()> {
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| RegistryError::Storage(format!("Failed to serialize config store: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    RegistryError::Storage(format!("Failed to create config store directory: {}", e))
                })?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .map_err(|e| RegistryError::Storage(format!("Failed to write config store: {}", e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| RegistryError::Storage(format!("Failed to replace config store: {}", e)))
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> RegistryResult<T> {
        let mut state = self.state.lock().map_err(|_| RegistryError::poisoned())?;
        let mut next = state.clone();
        let out = f(&mut next);
        self.save_state(&next)?;
        *state = next;
        Ok(out)
    }
}

impl ConfigStore for FileConfigStore {
    fn get(&self, id: &str) -> RegistryResult<Option<StoredEndpoint>> {
        let state = self.state.lock().map_err(|_| RegistryError::poisoned())?;
        Ok(state.endpoints.get(id).cloned())
    }

    fn put(&self, entry: StoredEndpoint) -> RegistryResult<()> {
        self.mutate(|state| {
            state.endpoints.insert(entry.config.id.clone(), entry);
        })
    }

    fn remove(&self, id: &str) -> RegistryResult<bool> {
        self.mutate(|state| state.remove(id))
    }

    fn list(&self) -> RegistryResult<Vec<StoredEndpoint>> {
        let state = self.state.lock().map_err(|_| RegistryError::poisoned())?;
        Ok(state.endpoints.values().cloned().collect())
    }

    fn record_access(&self, id: &str, at: DateTime<Utc>) -> RegistryResult<bool> {
        self.mutate(|state| state.record_access(id, at))
    }

    fn sweep(&self, cutoff: DateTime<Utc>) -> RegistryResult<Vec<String>> {
        self.mutate(|state| state.sweep(cutoff))
    }

    fn is_known(&self, id: &str) -> RegistryResult<bool> {
        let state = self.state.lock().map_err(|_| RegistryError::poisoned())?;
        Ok(state.is_known(id))
    }
}
