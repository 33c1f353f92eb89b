//! HTTP API Tests
//!
//! Drives the full router in-process against a fake spreadsheet provider:
//! - Endpoint creation, lookup, deletion and stats
//! - Envelope shape per capability
//! - Provider error mapping and cache behavior
//! - Default endpoint and sample fallback
//! - Rate limiting and health

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use futures_util::future::BoxFuture;
use serde_json::{json, Value};
use tower::ServiceExt;

use sheetapi::fetcher::{ProviderError, ProviderResult, SheetProvider, SpreadsheetMeta, TabInfo};
use sheetapi::http_server::{ApiSettings, AppState, HttpServer, RateLimitConfig, SharedState};
use sheetapi::observability::MetricsRegistry;
use chrono::{DateTime, Utc};
use sheetapi::registry::{
    ConfigStore, EndpointRegistry, MemConfigStore, PartialConfig, RegistryError, RegistryResult,
    StoredEndpoint,
};
use sheetapi::sheet::Grid;

// =============================================================================
// Test Utilities
// =============================================================================

/// Provider serving fixed tabs; unknown tabs answer like the real API
#[derive(Default)]
struct FakeProvider {
    tabs: HashMap<(String, String), Result<Grid, (u16, String)>>,
    calls: AtomicUsize,
}

impl FakeProvider {
    fn with_tab(mut self, spreadsheet: &str, tab: &str, grid: Grid) -> Self {
        self.tabs.insert((spreadsheet.into(), tab.into()), Ok(grid));
        self
    }

    fn with_failure(mut self, spreadsheet: &str, tab: &str, status: u16, message: &str) -> Self {
        self.tabs
            .insert((spreadsheet.into(), tab.into()), Err((status, message.into())));
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SheetProvider for FakeProvider {
    fn values<'a>(&'a self, spreadsheet_id: &'a str, tab: &'a str) -> BoxFuture<'a, ProviderResult<Grid>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = match self.tabs.get(&(spreadsheet_id.to_string(), tab.to_string())) {
            Some(Ok(grid)) => Ok(grid.clone()),
            Some(Err((status, message))) => Err(ProviderError::Status {
                status: *status,
                message: message.clone(),
            }),
            None => Err(ProviderError::Status {
                status: 400,
                message: format!("Unable to parse range: '{}'", tab),
            }),
        };
        Box::pin(async move { outcome })
    }

    fn metadata<'a>(&'a self, spreadsheet_id: &'a str) -> BoxFuture<'a, ProviderResult<SpreadsheetMeta>> {
        let mut tabs: Vec<TabInfo> = self
            .tabs
            .keys()
            .filter(|(s, _)| s == spreadsheet_id)
            .map(|(_, t)| TabInfo { name: t.clone(), index: 0 })
            .collect();
        tabs.sort_by(|a, b| a.name.cmp(&b.name));
        for (i, tab) in tabs.iter_mut().enumerate() {
            tab.index = i as u32;
        }

        let outcome = if tabs.is_empty() {
            Err(ProviderError::Status {
                status: 404,
                message: "Requested entity was not found.".into(),
            })
        } else {
            Ok(SpreadsheetMeta {
                title: "Company".into(),
                tabs,
            })
        };
        Box::pin(async move { outcome })
    }
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn staff() -> Grid {
    vec![
        row(&["Name", "Department", "City"]),
        row(&["Ann", "Engineering", "Oslo"]),
        row(&["Bo", "Sales", "Lima"]),
        row(&["Cy", "engineering", "Oslo"]),
        row(&["Di", "Support"]),
    ]
}

fn provider() -> FakeProvider {
    FakeProvider::default()
        .with_tab("company", "Staff", staff())
        .with_tab("company", "Empty", Vec::new())
        .with_failure("private", "Sheet1", 403, "The caller does not have permission")
        .with_failure("flaky", "Sheet1", 503, "Backend Error")
}

struct Harness {
    router: Router,
    state: SharedState,
    provider: Arc<FakeProvider>,
}

/// Store whose access counter can never be persisted
#[derive(Debug, Default)]
struct CounterFailingStore {
    inner: MemConfigStore,
}

impl ConfigStore for CounterFailingStore {
    fn get(&self, id: &str) -> RegistryResult<Option<StoredEndpoint>> {
        self.inner.get(id)
    }

    fn put(&self, entry: StoredEndpoint) -> RegistryResult<()> {
        self.inner.put(entry)
    }

    fn remove(&self, id: &str) -> RegistryResult<bool> {
        self.inner.remove(id)
    }

    fn list(&self) -> RegistryResult<Vec<StoredEndpoint>> {
        self.inner.list()
    }

    fn record_access(&self, _id: &str, _at: DateTime<Utc>) -> RegistryResult<bool> {
        Err(RegistryError::Storage("disk full".into()))
    }

    fn sweep(&self, cutoff: DateTime<Utc>) -> RegistryResult<Vec<String>> {
        self.inner.sweep(cutoff)
    }

    fn is_known(&self, id: &str) -> RegistryResult<bool> {
        self.inner.is_known(id)
    }
}

fn harness_with(settings: ApiSettings, provider: FakeProvider) -> Harness {
    harness_with_registry(settings, provider, EndpointRegistry::in_memory())
}

fn harness_with_registry(settings: ApiSettings, provider: FakeProvider, registry: EndpointRegistry) -> Harness {
    let provider = Arc::new(provider);
    let state = AppState::new(
        settings,
        registry,
        provider.clone(),
        Arc::new(MetricsRegistry::new()),
    )
    .shared();

    Harness {
        router: HttpServer::build_router(state.clone()),
        state,
        provider,
    }
}

fn harness() -> Harness {
    harness_with(ApiSettings::default(), provider())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create(h: &Harness, body: Value) -> Value {
    let (status, created) = send(&h.router, post_json("/api/apis", &body.to_string())).await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    created
}

fn staff_api() -> Value {
    json!({"spreadsheetRef": "company", "tabName": "Staff", "displayName": "Staff API"})
}

// =============================================================================
// Endpoint management
// =============================================================================

#[tokio::test]
async fn test_create_returns_config_with_links() {
    let h = harness();
    let created = create(
        &h,
        json!({
            "spreadsheetRef": "https://docs.google.com/spreadsheets/d/company/edit#gid=0",
            "tabName": "Staff",
            "displayName": "Staff API",
            "enablePagination": true
        }),
    )
    .await;

    let id = created["id"].as_str().unwrap();
    assert_eq!(created["spreadsheetRef"], "company");
    assert_eq!(created["enableFilters"], false);
    assert_eq!(created["enablePagination"], true);
    assert_eq!(created["cacheDurationSeconds"], 300);
    assert_eq!(created["endpoint"], format!("http://localhost:3000/api/apis/{}/data", id));
    assert_eq!(created["searchEndpoint"], format!("http://localhost:3000/api/apis/{}/data/search", id));

    let (status, fetched) = send(&h.router, get(&format!("/api/apis/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["displayName"], "Staff API");

    let (_, listed) = send(&h.router, get("/api/apis")).await;
    assert_eq!(listed["total"], 1);
}

#[tokio::test]
async fn test_create_rejects_invalid_bodies() {
    let h = harness();

    for body in [
        json!({"tabName": "Staff", "displayName": "x"}).to_string(),
        json!({"spreadsheetRef": "company", "displayName": "x"}).to_string(),
        json!({"spreadsheetRef": "company", "tabName": "Staff"}).to_string(),
        json!({"spreadsheetRef": "company", "tabName": "Staff", "displayName": "x", "cacheDurationSeconds": 86401}).to_string(),
        json!({"spreadsheetRef": "company", "tabName": "Staff", "displayName": "x", "cacheDurationSeconds": -5}).to_string(),
        json!({"spreadsheetRef": "company", "tabName": "Staff", "displayName": "x", "enableFilters": "yes"}).to_string(),
        "{ not json".to_string(),
    ] {
        let (status, error) = send(&h.router, post_json("/api/apis", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(error["kind"], "INVALID_REQUEST");
        assert_eq!(error["code"], 400);
        assert!(error["timestamp"].is_string());
    }
    assert!(h.state.registry.is_empty().unwrap());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let h = harness();
    let id = create(&h, staff_api()).await["id"].as_str().unwrap().to_string();
    let uri = format!("/api/apis/{}", id);

    let (status, first) = send(&h.router, delete(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["deleted"], true);

    let (status, second) = send(&h.router, delete(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["deleted"], false);

    let (status, error) = send(&h.router, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["kind"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_endpoint_data_is_404() {
    let h = harness();
    let (status, error) = send(&h.router, get("/api/apis/unknown-id/data")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["kind"], "NOT_FOUND");
    assert_eq!(h.provider.calls(), 0);
}

#[tokio::test]
async fn test_stats_count_accesses() {
    let h = harness();
    let id = create(&h, staff_api()).await["id"].as_str().unwrap().to_string();

    send(&h.router, get(&format!("/api/apis/{}/data", id))).await;
    send(&h.router, get(&format!("/api/apis/{}/data/search?City=oslo", id))).await;

    let (status, stats) = send(&h.router, get(&format!("/api/apis/{}/stats", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["accessCount"], 2);
    assert!(stats["lastAccessedAt"].is_string());
    assert!(stats["createdAt"].is_string());
}

#[tokio::test]
async fn test_failed_access_record_still_serves_data() {
    let registry = EndpointRegistry::new(Arc::new(CounterFailingStore::default()));
    let h = harness_with_registry(ApiSettings::default(), provider(), registry);
    let id = create(&h, staff_api()).await["id"].as_str().unwrap().to_string();

    let (status, env) = send(&h.router, get(&format!("/api/apis/{}/data", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(env["count"], 4);
    assert_eq!(h.state.metrics.snapshot().access_record_failures, 1);

    let (_, stats) = send(&h.router, get(&format!("/api/apis/{}/stats", id))).await;
    assert_eq!(stats["accessCount"], 0);
}

// =============================================================================
// Data routes
// =============================================================================

#[tokio::test]
async fn test_plain_endpoint_ignores_query_features() {
    let h = harness();
    let id = create(&h, staff_api()).await["id"].as_str().unwrap().to_string();

    let (status, env) = send(&h.router, get(&format!("/api/apis/{}/data?City=oslo&limit=1", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(env["count"], 4);
    assert_eq!(env["total"], 4);
    assert_eq!(env["cached"], false);
    assert_eq!(env["source"]["endpoint"], id);
    assert_eq!(env["source"]["kind"], "spreadsheet");
    assert_eq!(env["data"][3], json!({"Name": "Di", "Department": "Support", "City": ""}));
    assert!(env.get("limit").is_none());
    assert!(env.get("filtered").is_none());
}

#[tokio::test]
async fn test_enabled_features_apply() {
    let h = harness();
    let mut body = staff_api();
    body["enableFilters"] = json!(true);
    body["enablePagination"] = json!(true);
    let id = create(&h, body).await["id"].as_str().unwrap().to_string();

    let (_, env) = send(
        &h.router,
        get(&format!("/api/apis/{}/data?Department=ENG&limit=1&offset=0", id)),
    )
    .await;

    assert_eq!(env["total"], 2);
    assert_eq!(env["count"], 1);
    assert_eq!(env["limit"], 1);
    assert_eq!(env["offset"], 0);
    assert_eq!(env["hasMore"], true);
    assert_eq!(env["filtered"], true);
    assert_eq!(env["filters_applied"], json!({"Department": "ENG"}));
}

#[tokio::test]
async fn test_search_route_always_filters() {
    let h = harness();
    let id = create(&h, staff_api()).await["id"].as_str().unwrap().to_string();

    let (_, env) = send(
        &h.router,
        get(&format!("/api/apis/{}/data/search?Department=eng&limit=abc", id)),
    )
    .await;

    assert_eq!(env["count"], 2);
    assert_eq!(env["limit"], 2);
    assert_eq!(env["hasMore"], false);
    assert_eq!(env["filtered"], true);
}

#[tokio::test]
async fn test_repeated_fetch_hits_cache() {
    let h = harness();
    let id = create(&h, staff_api()).await["id"].as_str().unwrap().to_string();
    let uri = format!("/api/apis/{}/data", id);

    let (_, first) = send(&h.router, get(&uri)).await;
    let (_, second) = send(&h.router, get(&uri)).await;

    assert_eq!(first["cached"], false);
    assert_eq!(second["cached"], true);
    assert_eq!(h.provider.calls(), 1);
}

#[tokio::test]
async fn test_zero_cache_duration_always_fetches() {
    let h = harness();
    let mut body = staff_api();
    body["cacheDurationSeconds"] = json!(0);
    let id = create(&h, body).await["id"].as_str().unwrap().to_string();
    let uri = format!("/api/apis/{}/data", id);

    send(&h.router, get(&uri)).await;
    let (_, second) = send(&h.router, get(&uri)).await;

    assert_eq!(second["cached"], false);
    assert_eq!(h.provider.calls(), 2);
}

#[tokio::test]
async fn test_each_endpoint_applies_its_own_cache_duration() {
    let h = harness();
    let mut long = staff_api();
    long["cacheDurationSeconds"] = json!(86_400);
    let mut short = staff_api();
    short["cacheDurationSeconds"] = json!(1);
    let long_id = create(&h, long).await["id"].as_str().unwrap().to_string();
    let short_id = create(&h, short).await["id"].as_str().unwrap().to_string();

    send(&h.router, get(&format!("/api/apis/{}/data", long_id))).await;
    tokio::time::sleep(std::time::Duration::from_millis(1_100)).await;

    let (_, short_env) = send(&h.router, get(&format!("/api/apis/{}/data", short_id))).await;
    assert_eq!(short_env["cached"], false);
    let (_, long_env) = send(&h.router, get(&format!("/api/apis/{}/data", long_id))).await;
    assert_eq!(long_env["cached"], true);
    assert_eq!(h.provider.calls(), 2);
}

// =============================================================================
// Provider errors
// =============================================================================

#[tokio::test]
async fn test_forbidden_sheet_is_access_denied() {
    let h = harness();
    let id = create(
        &h,
        json!({"spreadsheetRef": "private", "tabName": "Sheet1", "displayName": "Secret"}),
    )
    .await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, error) = send(&h.router, get(&format!("/api/apis/{}/data", id))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["kind"], "ACCESS_DENIED");
}

#[tokio::test]
async fn test_unknown_tab_is_not_found() {
    let h = harness();
    let id = create(
        &h,
        json!({"spreadsheetRef": "company", "tabName": "Nope", "displayName": "Missing"}),
    )
    .await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, error) = send(&h.router, get(&format!("/api/apis/{}/data", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["kind"], "NOT_FOUND");
}

#[tokio::test]
async fn test_provider_outage_is_bad_gateway() {
    let h = harness();
    let (status, error) = send(&h.router, get("/api/sheets/flaky")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(error["kind"], "UPSTREAM_UNAVAILABLE");
}

// =============================================================================
// Default endpoint
// =============================================================================

#[tokio::test]
async fn test_default_data_serves_sample_when_unconfigured() {
    let h = harness();

    let (status, env) = send(&h.router, get("/api/data")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(env["count"], 5);
    assert_eq!(env["source"]["kind"], "sample");

    let (_, search) = send(&h.router, get("/api/data/search?Department=engineering&limit=1")).await;
    assert_eq!(search["count"], 1);
    assert_eq!(search["filtered"], true);
    assert_eq!(h.provider.calls(), 0);

    let (_, health) = send(&h.router, get("/health")).await;
    assert_eq!(health["dataRows"], 5);
}

fn default_settings(spreadsheet: &str, fallback_to_sample: bool) -> ApiSettings {
    let config = PartialConfig::new(spreadsheet, "Sheet1", "Default")
        .into_config("default".into(), chrono::Utc::now())
        .unwrap();
    ApiSettings {
        default_endpoint: Some(config),
        fallback_to_sample,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_default_endpoint_falls_back_when_enabled() {
    let h = harness_with(default_settings("private", true), provider());

    let (status, env) = send(&h.router, get("/api/data")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(env["source"]["kind"], "sample");
    assert_eq!(h.state.metrics.snapshot().sample_fallbacks, 1);
}

#[tokio::test]
async fn test_default_endpoint_surfaces_errors_without_fallback() {
    let h = harness_with(default_settings("private", false), provider());

    let (status, error) = send(&h.router, get("/api/data")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["kind"], "ACCESS_DENIED");
}

#[tokio::test]
async fn test_default_endpoint_serves_live_rows() {
    let provider = provider().with_tab("company", "Sheet1", staff());
    let h = harness_with(default_settings("company", true), provider);

    let (_, env) = send(&h.router, get("/api/data")).await;
    assert_eq!(env["source"]["kind"], "spreadsheet");
    assert_eq!(env["source"]["endpoint"], "default");
    assert_eq!(env["count"], 4);
}

// =============================================================================
// Sheet routes
// =============================================================================

#[tokio::test]
async fn test_tabs_and_preview() {
    let h = harness();

    let (status, tabs) = send(&h.router, get("/api/sheets/company/tabs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tabs["title"], "Company");
    assert_eq!(tabs["tabs"][0]["name"], "Empty");
    assert_eq!(tabs["tabs"][1]["name"], "Staff");

    let (_, preview) = send(&h.router, get("/api/sheets/company/preview?tab=Staff&rows=2")).await;
    assert_eq!(preview["headers"], json!(["Name", "Department", "City"]));
    assert_eq!(preview["rows"].as_array().unwrap().len(), 2);
    assert_eq!(preview["totalRows"], 4);
    assert_eq!(preview["isEmpty"], false);

    let (_, empty) = send(&h.router, get("/api/sheets/company/preview?tab=Empty")).await;
    assert_eq!(empty["isEmpty"], true);
    assert_eq!(empty["totalRows"], 0);
}

#[tokio::test]
async fn test_sheet_proxy() {
    let h = harness();
    let (status, env) = send(&h.router, get("/api/sheets/company?sheet=Staff")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(env["count"], 4);
    assert!(env["source"].get("endpoint").is_none());

    let (status, error) = send(&h.router, get("/api/sheets/not%20valid/tabs")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["kind"], "INVALID_REQUEST");
}

// =============================================================================
// Rate limiting and health
// =============================================================================

fn limited(max_requests: u32, trust_proxy: bool) -> Harness {
    let settings = ApiSettings {
        rate_limit: RateLimitConfig {
            max_requests,
            window_secs: 60,
            trust_proxy,
        },
        ..Default::default()
    };
    harness_with(settings, provider())
}

fn from_peer(uri: &str, peer: &str, forwarded_for: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = forwarded_for {
        builder = builder.header("x-forwarded-for", value);
    }
    let mut request = builder.body(Body::empty()).unwrap();
    let addr: SocketAddr = peer.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

#[tokio::test]
async fn test_rate_limit_rejects_over_budget() {
    let h = limited(2, false);

    for _ in 0..2 {
        let (status, _) = send(&h.router, get("/api/data")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let response = h.router.clone().oneshot(get("/api/data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response.headers()[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 0 && retry_after <= 60);

    let (status, _) = send(&h.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.state.metrics.snapshot().rate_limited, 1);
}

#[tokio::test]
async fn test_rotating_forwarded_for_does_not_bypass_limit() {
    let h = limited(1, false);

    let mut accepted = 0;
    for i in 0..50 {
        let forwarded = format!("192.0.2.{}", i);
        let request = from_peer("/api/data", "198.51.100.9:5000", Some(forwarded.as_str()));
        let (status, _) = send(&h.router, request).await;
        if status == StatusCode::OK {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);

    let (status, _) = send(&h.router, from_peer("/api/data", "198.51.100.10:5000", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_trusted_proxy_keys_on_forwarded_for() {
    let h = limited(1, true);
    let proxy = "10.0.0.1:443";

    let (status, _) = send(&h.router, from_peer("/api/data", proxy, Some("203.0.113.9"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&h.router, from_peer("/api/data", proxy, Some("203.0.113.10"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&h.router, from_peer("/api/data", proxy, Some("203.0.113.9"))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let h = harness();
    create(&h, staff_api()).await;

    let (status, health) = send(&h.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "OK");
    assert_eq!(health["apis"], 1);
    assert_eq!(health["dataRows"], 0);
    assert!(health["uptime_secs"].is_u64());

    let (status, metrics) = send(&h.router, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics["endpoints_created"], 1);

    let (status, docs) = send(&h.router, get("/docs")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(docs["routes"].as_array().unwrap().len() > 5);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let h = harness();
    let response = h.router.clone().oneshot(get("/health")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
