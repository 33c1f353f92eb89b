//! Observability HTTP Routes
//!
//! Health, counters and a route listing. Not rate limited.

use axum::{extract::State, routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::observability::MetricsSnapshot;

use super::errors::ApiResult;
use super::state::SharedState;

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    #[serde(rename = "uptime_secs")]
    pub uptime_secs: u64,
    pub version: String,
    /// Generated endpoints currently registered
    pub apis: usize,
    /// Rows in the last grid served for the default endpoint
    pub data_rows: usize,
}

#[derive(Debug, Serialize)]
pub struct RouteDoc {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DocsResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub routes: Vec<RouteDoc>,
}

const ROUTES: [(&str, &str, &str); 15] = [
    ("GET", "/health", "Liveness, uptime and row count"),
    ("GET", "/metrics", "Service counters"),
    ("GET", "/docs", "This listing"),
    ("GET", "/api/data", "Rows of the default endpoint"),
    ("GET", "/api/data/search", "Default endpoint rows with ?Column=value&limit=N&offset=M"),
    ("GET", "/api/apis", "List generated APIs"),
    ("POST", "/api/apis", "Generate an API from {spreadsheetRef, tabName, displayName, ...}"),
    ("GET", "/api/apis/:id", "Get one generated API"),
    ("DELETE", "/api/apis/:id", "Delete a generated API (idempotent)"),
    ("GET", "/api/apis/:id/stats", "Access counters of a generated API"),
    ("GET", "/api/apis/:id/data", "Rows of a generated API"),
    ("GET", "/api/apis/:id/data/search", "Rows of a generated API with filters and pagination"),
    ("GET", "/api/sheets/:spreadsheet", "Rows of ?sheet=NAME without generating an API"),
    ("GET", "/api/sheets/:spreadsheet/tabs", "Spreadsheet title and tabs"),
    ("GET", "/api/sheets/:spreadsheet/preview", "First ?rows=N rows of ?tab=NAME"),
];

/// Create observability routes (mounted at the root)
pub fn observability_routes() -> Router<SharedState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/docs", get(docs_handler))
}

/// Health check handler; an unreadable config store is reported as 500
async fn health_handler(State(state): State<SharedState>) -> ApiResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime_secs: state.uptime().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        apis: state.registry.len()?,
        data_rows: state.default_rows(),
    }))
}

/// Metrics handler - returns counters as JSON
async fn metrics_handler(State(state): State<SharedState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

async fn docs_handler() -> Json<DocsResponse> {
    Json(DocsResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        routes: ROUTES
            .iter()
            .map(|&(method, path, description)| RouteDoc {
                method,
                path,
                description,
            })
            .collect(),
    })
}
