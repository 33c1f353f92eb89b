//! # Spreadsheet Provider Abstraction
//!
//! The remote spreadsheet service, reduced to the two calls the service
//! needs: tab metadata and the cell grid of one tab.

use futures_util::future::BoxFuture;
use serde::Serialize;

use crate::sheet::Grid;

use super::errors::ProviderResult;

/// One tab of a spreadsheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabInfo {
    pub name: String,
    pub index: u32,
}

/// Spreadsheet-level metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpreadsheetMeta {
    pub title: String,
    /// Tabs sorted by index
    pub tabs: Vec<TabInfo>,
}

/// Remote spreadsheet source
pub trait SheetProvider: Send + Sync {
    /// Fetch all cells of one tab, first row being the header row
    fn values<'a>(&'a self, spreadsheet_id: &'a str, tab: &'a str) -> BoxFuture<'a, ProviderResult<Grid>>;

    /// Fetch spreadsheet title and tab list
    fn metadata<'a>(&'a self, spreadsheet_id: &'a str) -> BoxFuture<'a, ProviderResult<SpreadsheetMeta>>;
}
