//! Data HTTP Routes
//!
//! Envelope-producing routes: the default endpoint at `/api/data` and every
//! generated endpoint at `/api/apis/:id/data`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::fetcher::Served;
use crate::observability::{log_event_with_fields, Event};
use crate::sheet::{compose, flatten, Capabilities, Envelope, Grid, QueryPlan, SourceInfo};

use super::errors::ApiResult;
use super::state::{AppState, SharedState, DEFAULT_ENDPOINT_ID};

/// Display name of the built-in sample dataset
const SAMPLE_NAME: &str = "SheetAPI Sample Data";

type QueryPairs = Query<Vec<(String, String)>>;

/// Create data routes (mounted under `/api`)
pub fn data_routes() -> Router<SharedState> {
    Router::new()
        .route("/data", get(default_data_handler))
        .route("/data/search", get(default_search_handler))
        .route("/apis/:id/data", get(endpoint_data_handler))
        .route("/apis/:id/data/search", get(endpoint_search_handler))
}

/// Run flatten → plan → query → compose over a fetched grid
pub(crate) fn respond(
    grid: &Grid,
    params: &[(String, String)],
    capabilities: Capabilities,
    source: &SourceInfo,
    cached: bool,
) -> Envelope {
    let collection = flatten(grid);
    let plan = QueryPlan::from_params(params, capabilities);
    let page = plan.execute(collection.records());
    compose(page, &plan, source, cached)
}

async fn default_data_handler(
    State(state): State<SharedState>,
    Query(params): QueryPairs,
) -> ApiResult<Json<Envelope>> {
    serve_default(&state, &params, false).await.map(Json)
}

async fn default_search_handler(
    State(state): State<SharedState>,
    Query(params): QueryPairs,
) -> ApiResult<Json<Envelope>> {
    serve_default(&state, &params, true).await.map(Json)
}

async fn endpoint_data_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(params): QueryPairs,
) -> ApiResult<Json<Envelope>> {
    serve_endpoint(&state, &id, &params, false).await.map(Json)
}

async fn endpoint_search_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(params): QueryPairs,
) -> ApiResult<Json<Envelope>> {
    serve_endpoint(&state, &id, &params, true).await.map(Json)
}

/// Serve the default endpoint, substituting sample rows through the
/// fallback wrapper when configured
async fn serve_default(state: &AppState, params: &[(String, String)], search: bool) -> ApiResult<Envelope> {
    let (grid, cached, source, capabilities) = match &state.settings.default_endpoint {
        None => (
            state.fallback.sample(),
            false,
            SourceInfo::sample(Some(DEFAULT_ENDPOINT_ID.to_string()), SAMPLE_NAME),
            Capabilities::default(),
        ),
        Some(config) => {
            let result = state
                .fetcher
                .fetch_grid(&config.spreadsheet_ref, &config.tab_name, config.cache_ttl())
                .await;
            match state.fallback.recover(result, &config.id)? {
                Served::Live(fetched) => (fetched.grid, fetched.cached, config.source_info(), config.capabilities()),
                Served::Sample(grid) => (
                    grid,
                    false,
                    SourceInfo::sample(Some(config.id.clone()), config.display_name.clone()),
                    config.capabilities(),
                ),
            }
        }
    };

    let capabilities = if search { Capabilities::all() } else { capabilities };
    state.set_default_rows(data_rows(&grid));
    Ok(respond(&grid, params, capabilities, &source, cached))
}

/// Serve a generated endpoint. Fetch failures are reported, never replaced.
async fn serve_endpoint(
    state: &AppState,
    id: &str,
    params: &[(String, String)],
    search: bool,
) -> ApiResult<Envelope> {
    let config = state.registry.get(id)?;
    record_access(state, id).await;

    let fetched = state
        .fetcher
        .fetch_grid(&config.spreadsheet_ref, &config.tab_name, config.cache_ttl())
        .await?;

    let capabilities = if search { Capabilities::all() } else { config.capabilities() };
    Ok(respond(&fetched.grid, params, capabilities, &config.source_info(), fetched.cached))
}

/// Bump the access counter off the async workers. A failure is logged and
/// counted; it never fails the data request.
async fn record_access(state: &AppState, id: &str) {
    let registry = state.registry.clone();
    let owned_id = id.to_string();
    let error = match tokio::task::spawn_blocking(move || registry.touch(&owned_id)).await {
        Ok(Ok(())) => return,
        Ok(Err(e)) => e.to_string(),
        Err(e) => e.to_string(),
    };

    state.metrics.increment_access_record_failures();
    log_event_with_fields(
        Event::AccessRecordFailed,
        &[("error", error.as_str()), ("id", id)],
    );
}

fn data_rows(grid: &Arc<Grid>) -> usize {
    grid.len().saturating_sub(1)
}
