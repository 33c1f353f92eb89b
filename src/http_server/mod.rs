//! # HTTP Server Module
//!
//! Axum server exposing spreadsheet tabs as JSON APIs.
//!
//! # Endpoints
//!
//! - `/health`, `/metrics`, `/docs` - Observability
//! - `/api/data` - Default endpoint (sample data when unconfigured)
//! - `/api/apis/*` - Generated APIs and their data
//! - `/api/sheets/*` - Ad-hoc tab listing, preview and proxy
//!
//! Everything under `/api` passes the rate-limit gate first.

pub mod apis_routes;
pub mod config;
pub mod data_routes;
pub mod errors;
pub mod observability_routes;
pub mod rate_limit;
pub mod server;
pub mod sheets_routes;
pub mod state;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use server::HttpServer;
pub use state::{ApiSettings, AppState, SharedState, DEFAULT_ENDPOINT_ID};
