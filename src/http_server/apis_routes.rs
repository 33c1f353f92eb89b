//! Endpoint Management HTTP Routes
//!
//! Create, inspect and delete generated APIs.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::observability::{log_event_with_fields, Event};
use crate::registry::{EndpointConfig, PartialConfig};

use super::errors::ApiResult;
use super::state::{AppState, SharedState};

// ==================
// Request/Response Types
// ==================

/// An endpoint config with its client-facing URLs
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    #[serde(flatten)]
    pub config: EndpointConfig,
    pub endpoint: String,
    pub search_endpoint: String,
}

impl ApiResponse {
    fn new(state: &AppState, config: EndpointConfig) -> Self {
        let endpoint = state.endpoint_url(&config.id);
        Self {
            search_endpoint: format!("{}/search", endpoint),
            endpoint,
            config,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApisListResponse {
    pub apis: Vec<ApiResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: String,
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub id: String,
    pub access_count: u64,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// ==================
// Routes
// ==================

/// Create endpoint management routes (mounted under `/api`)
pub fn apis_routes() -> Router<SharedState> {
    Router::new()
        .route("/apis", get(list_apis_handler).post(create_api_handler))
        .route("/apis/:id", get(get_api_handler).delete(delete_api_handler))
        .route("/apis/:id/stats", get(api_stats_handler))
}

async fn list_apis_handler(State(state): State<SharedState>) -> ApiResult<Json<ApisListResponse>> {
    let apis: Vec<ApiResponse> = state
        .registry
        .list()?
        .into_iter()
        .map(|config| ApiResponse::new(&state, config))
        .collect();

    Ok(Json(ApisListResponse {
        total: apis.len(),
        apis,
    }))
}

async fn create_api_handler(
    State(state): State<SharedState>,
    body: Result<Json<PartialConfig>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    let Json(partial) = body?;
    let config = state.registry.create(partial)?;

    state.metrics.increment_endpoints_created();
    log_event_with_fields(
        Event::EndpointCreated,
        &[
            ("id", config.id.as_str()),
            ("spreadsheet", config.spreadsheet_ref.as_str()),
            ("tab", config.tab_name.as_str()),
        ],
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::new(&state, config))))
}

async fn get_api_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    let config = state.registry.get(&id)?;
    Ok(Json(ApiResponse::new(&state, config)))
}

/// Deleting an unknown id is still a 200, with `deleted: false`
async fn delete_api_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.registry.delete(&id)?;

    if deleted {
        state.metrics.increment_endpoints_deleted();
        log_event_with_fields(Event::EndpointDeleted, &[("id", id.as_str())]);
    }

    Ok(Json(DeleteResponse { id, deleted }))
}

async fn api_stats_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatsResponse>> {
    let stored = state.registry.stored(&id)?;

    Ok(Json(StatsResponse {
        id: stored.config.id,
        access_count: stored.usage.access_count,
        last_accessed_at: stored.usage.last_accessed_at,
        created_at: stored.config.created_at,
    }))
}
