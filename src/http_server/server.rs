//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event, Logger};

use super::apis_routes::apis_routes;
use super::config::HttpServerConfig;
use super::data_routes::data_routes;
use super::observability_routes::observability_routes;
use super::rate_limit::rate_limit_gate;
use super::sheets_routes::sheets_routes;
use super::state::SharedState;

/// Response header carrying the request id
const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP Server for the sheet API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(state: SharedState) -> Self {
        let config = state.settings.server.clone();
        let router = Self::build_router(state);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(state: SharedState) -> Router {
        let cors = cors_layer(&state.settings.server);

        let api = Router::new()
            .merge(data_routes())
            .merge(apis_routes())
            .merge(sheets_routes())
            .layer(middleware::from_fn_with_state(state.clone(), rate_limit_gate));

        Router::new()
            .merge(observability_routes())
            .nest("/api", api)
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::from_fn_with_state(state.clone(), log_requests))
                    .layer(cors),
            )
            .with_state(state)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until interrupted
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        let addr_str = addr.to_string();
        let base_url = self.config.base_url();
        log_event_with_fields(
            Event::ServerStart,
            &[("addr", addr_str.as_str()), ("base_url", base_url.as_str())],
        );

        axum::serve(
            listener,
            self.router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        log_event_with_fields(Event::ServerStop, &[("addr", addr_str.as_str())]);
        Ok(())
    }
}

fn cors_layer(config: &HttpServerConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        let error = e.to_string();
        Logger::error("SIGNAL_HANDLER_FAILED", &[("error", error.as_str())]);
        std::future::pending::<()>().await;
    }
}

/// Log every request once on completion and count it
async fn log_requests(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    let status = response.status();
    state.metrics.record_request(!(status.is_client_error() || status.is_server_error()));

    let status_str = status.as_u16().to_string();
    let latency_ms = started.elapsed().as_millis().to_string();
    log_event_with_fields(
        Event::RequestComplete,
        &[
            ("latency_ms", latency_ms.as_str()),
            ("method", method.as_str()),
            ("path", path.as_str()),
            ("request_id", request_id.as_str()),
            ("status", status_str.as_str()),
        ],
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
