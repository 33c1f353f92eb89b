//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//! - Lock-free counters exposed at `/metrics`
//!
//! # Usage
//!
//! ```ignore
//! use sheetapi::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::CacheMiss, &[("tab", "Sheet1")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_cache_misses();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields; failure events log at WARN
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_failure() {
        Severity::Warn
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}
