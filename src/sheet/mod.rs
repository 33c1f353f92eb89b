//! # Sheet Data Engine
//!
//! Pure transformations from a provider grid to the JSON envelope:
//! flatten → plan → query → compose. Nothing in this module performs I/O
//! or can fail.

pub mod filter;
pub mod grid;
pub mod plan;
pub mod query;
pub mod response;
pub mod sample;

pub use filter::FilterSet;
pub use grid::{flatten, Collection, Grid, Record};
pub use plan::{Capabilities, QueryPlan};
pub use query::{query, Page, PageRequest};
pub use response::{compose, Envelope, SourceInfo, SourceKind};
pub use sample::sample_grid;
