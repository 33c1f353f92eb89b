//! # Sheet Fetcher Module
//!
//! Retrieval of spreadsheet grids from the remote provider:
//!
//! - `SheetProvider` abstracts the provider; `GoogleSheetsProvider` is the
//!   real client
//! - `GridCache` holds successful fetches for the endpoint's cache duration
//! - Provider failures normalize to `AccessDenied`, `SheetNotFound` or
//!   `UpstreamUnavailable`
//! - Sample substitution happens only through an explicit `SampleFallback`

pub mod cache;
pub mod config;
pub mod errors;
pub mod fetcher;
pub mod fallback;
pub mod google;
pub mod provider;
pub mod reference;

pub use cache::{CacheEntry, CacheKey, GridCache, MemGridCache};
pub use config::ProviderConfig;
pub use errors::{FetchError, FetchResult, ProviderError, ProviderResult};
pub use fallback::{SampleFallback, Served};
pub use fetcher::{FetchedGrid, SheetFetcher};
pub use google::GoogleSheetsProvider;
pub use provider::{SheetProvider, SpreadsheetMeta, TabInfo};
pub use reference::normalize_spreadsheet_ref;
