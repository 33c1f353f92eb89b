//! sheetapi - serve spreadsheet tabs as filterable, paginated JSON APIs
//!
//! Request flow: registry resolves the endpoint → fetcher retrieves the grid
//! (through the cache) → sheet engine flattens, queries and composes the
//! envelope.

pub mod cli;
pub mod fetcher;
pub mod http_server;
pub mod observability;
pub mod registry;
pub mod sheet;
