//! # Rate Limiting
//!
//! Fixed request budget per client per window, checked before any `/api`
//! handler runs.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};

use super::errors::{ApiError, ApiResult};
use super::state::SharedState;

/// Tracked clients before expired windows are pruned
const PRUNE_THRESHOLD: usize = 10_000;

/// Client key used when no address is known
const ANONYMOUS_CLIENT: &str = "anonymous";

/// Rate limit configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per window (default: 100)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds (default: 900)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Key clients by the first `X-Forwarded-For` entry. Enable only behind
    /// a proxy that overwrites the header (default: false)
    #[serde(default)]
    pub trust_proxy: bool,
}

fn default_max_requests() -> u32 {
    100
}

fn default_window_secs() -> u64 {
    900
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            trust_proxy: false,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Per-client fixed window counter
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count one request for `client`.
    ///
    /// Fails with `RateLimited` once the budget of the current window is
    /// spent; `retry_after` is the whole seconds until the window resets.
    pub fn check(&self, client: &str, now: Instant) -> ApiResult<()> {
        let window_len = self.config.window();
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| ApiError::Internal("rate limiter lock poisoned".into()))?;

        if windows.len() >= PRUNE_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started_at) < window_len);
        }

        let window = windows.entry(client.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });
        if now.duration_since(window.started_at) >= window_len {
            *window = Window {
                started_at: now,
                count: 0,
            };
        }

        if window.count >= self.config.max_requests {
            let elapsed = now.duration_since(window.started_at);
            let remaining = window_len.saturating_sub(elapsed);
            let retry_after = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
            return Err(ApiError::RateLimited {
                retry_after: retry_after.max(1),
            });
        }

        window.count += 1;
        Ok(())
    }
}

/// Client identity: the peer address, or the first `X-Forwarded-For`
/// entry when `trust_proxy` is set
pub fn client_key(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(client) = forwarded {
            return client.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| ANONYMOUS_CLIENT.to_string())
}

/// Middleware rejecting clients over budget
pub async fn rate_limit_gate(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let client = client_key(&request, state.rate_limiter.config().trust_proxy);

    match state.rate_limiter.check(&client, Instant::now()) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            if let ApiError::RateLimited { retry_after } = &err {
                state.metrics.increment_rate_limited();
                let retry_after = retry_after.to_string();
                log_event_with_fields(
                    Event::RateLimited,
                    &[
                        ("client", client.as_str()),
                        ("path", request.uri().path()),
                        ("retry_after", retry_after.as_str()),
                    ],
                );
            }
            err.into_response()
        }
    }
}
