//! Observable service events
//!
//! Events are explicit and typed; the string form is what appears in the
//! `event` key of a log line.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    ConfigLoaded,
    ServerStart,
    ServerStop,

    // Requests
    RequestComplete,
    RateLimited,

    // Endpoint registry
    EndpointCreated,
    EndpointDeleted,
    SweepScheduled,
    SweepComplete,
    SweepFailed,
    AccessRecordFailed,

    // Provider access
    CacheHit,
    CacheMiss,
    UpstreamError,
    SampleFallback,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ServerStart => "SERVER_START",
            Event::ServerStop => "SERVER_STOP",
            Event::RequestComplete => "REQUEST_COMPLETE",
            Event::RateLimited => "RATE_LIMITED",
            Event::EndpointCreated => "ENDPOINT_CREATED",
            Event::EndpointDeleted => "ENDPOINT_DELETED",
            Event::SweepScheduled => "SWEEP_SCHEDULED",
            Event::SweepComplete => "SWEEP_COMPLETE",
            Event::SweepFailed => "SWEEP_FAILED",
            Event::AccessRecordFailed => "ACCESS_RECORD_FAILED",
            Event::CacheHit => "CACHE_HIT",
            Event::CacheMiss => "CACHE_MISS",
            Event::UpstreamError => "UPSTREAM_ERROR",
            Event::SampleFallback => "SAMPLE_FALLBACK",
        }
    }

    /// Events that indicate something went wrong
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::SweepFailed
                | Event::AccessRecordFailed
                | Event::UpstreamError
                | Event::SampleFallback
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
