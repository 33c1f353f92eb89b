//! # Endpoint Registry Module
//!
//! Generated API definitions: creation with defaults and validation,
//! lookup, idempotent deletion, access counters and idle sweeps.

pub mod endpoint;
pub mod errors;
pub mod registry;
pub mod store;
pub mod sweeper;

pub use endpoint::{EndpointConfig, PartialConfig, StoredEndpoint, UsageStats};
pub use errors::{RegistryError, RegistryResult};
pub use registry::EndpointRegistry;
pub use store::{ConfigStore, FileConfigStore, MemConfigStore};
pub use sweeper::{run_sweep, spawn_sweeper, SweepSchedule};
