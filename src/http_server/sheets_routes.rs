//! Sheet HTTP Routes
//!
//! Ad-hoc access to a spreadsheet without a generated endpoint: tab listing,
//! a small preview, and a read-only proxy.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::fetcher::{normalize_spreadsheet_ref, TabInfo};
use crate::sheet::{flatten, Capabilities, Envelope, Record, SourceInfo};

use super::data_routes::respond;
use super::errors::{ApiError, ApiResult};
use super::state::SharedState;

/// Tab used when the request names none
const DEFAULT_TAB: &str = "Sheet1";

const DEFAULT_PREVIEW_ROWS: usize = 10;
const MAX_PREVIEW_ROWS: usize = 100;

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct TabsResponse {
    pub spreadsheet: String,
    pub title: String,
    pub tabs: Vec<TabInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
    pub total_rows: usize,
    /// The tab has no rows at all, not even headers
    pub is_empty: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    #[serde(default)]
    pub tab: Option<String>,
    #[serde(default)]
    pub rows: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProxyQuery {
    #[serde(default)]
    pub sheet: Option<String>,
}

// ==================
// Routes
// ==================

/// Create sheet routes (mounted under `/api`)
pub fn sheets_routes() -> Router<SharedState> {
    Router::new()
        .route("/sheets/:spreadsheet", get(proxy_handler))
        .route("/sheets/:spreadsheet/tabs", get(tabs_handler))
        .route("/sheets/:spreadsheet/preview", get(preview_handler))
}

fn spreadsheet_id(raw: &str) -> ApiResult<String> {
    normalize_spreadsheet_ref(raw).ok_or_else(|| {
        ApiError::InvalidRequest(format!("'{}' is not a spreadsheet id or URL", raw))
    })
}

fn tab_or_default(tab: Option<String>) -> String {
    tab.map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TAB.to_string())
}

/// Requested preview size; unparseable values fall back to the default
fn preview_rows(raw: Option<&str>) -> usize {
    raw.and_then(|r| r.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_PREVIEW_ROWS)
        .min(MAX_PREVIEW_ROWS)
}

async fn tabs_handler(
    State(state): State<SharedState>,
    Path(spreadsheet): Path<String>,
) -> ApiResult<Json<TabsResponse>> {
    let id = spreadsheet_id(&spreadsheet)?;
    let meta = state.fetcher.fetch_metadata(&id).await?;

    Ok(Json(TabsResponse {
        spreadsheet: id,
        title: meta.title,
        tabs: meta.tabs,
    }))
}

async fn preview_handler(
    State(state): State<SharedState>,
    Path(spreadsheet): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> ApiResult<Json<PreviewResponse>> {
    let id = spreadsheet_id(&spreadsheet)?;
    let tab = tab_or_default(query.tab);
    let limit = preview_rows(query.rows.as_deref());

    let fetched = state
        .fetcher
        .fetch_grid(&id, &tab, state.settings.default_cache_ttl())
        .await?;
    let collection = flatten(&fetched.grid);

    Ok(Json(PreviewResponse {
        headers: collection.headers().to_vec(),
        total_rows: collection.len(),
        is_empty: collection.is_empty_source(),
        rows: collection.into_records().into_iter().take(limit).collect(),
    }))
}

/// Envelope for an ad-hoc (spreadsheet, tab) pair; filters and pagination off
async fn proxy_handler(
    State(state): State<SharedState>,
    Path(spreadsheet): Path<String>,
    Query(query): Query<ProxyQuery>,
) -> ApiResult<Json<Envelope>> {
    let id = spreadsheet_id(&spreadsheet)?;
    let tab = tab_or_default(query.sheet);

    let fetched = state
        .fetcher
        .fetch_grid(&id, &tab, state.settings.default_cache_ttl())
        .await?;
    let source = SourceInfo::spreadsheet(None, tab.clone(), id, tab);

    Ok(Json(respond(
        &fetched.grid,
        &[],
        Capabilities::default(),
        &source,
        fetched.cached,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_rows() {
        assert_eq!(preview_rows(None), 10);
        assert_eq!(preview_rows(Some("5")), 5);
        assert_eq!(preview_rows(Some("500")), 100);
        assert_eq!(preview_rows(Some("abc")), 10);
        assert_eq!(preview_rows(Some("-3")), 10);
    }

    #[test]
    fn test_tab_or_default() {
        assert_eq!(tab_or_default(None), "Sheet1");
        assert_eq!(tab_or_default(Some("  ".into())), "Sheet1");
        assert_eq!(tab_or_default(Some("Staff".into())), "Staff");
    }

    #[test]
    fn test_spreadsheet_id() {
        assert_eq!(spreadsheet_id("abc_123").unwrap(), "abc_123");
        assert!(matches!(spreadsheet_id("has space"), Err(ApiError::InvalidRequest(_))));
    }
}
