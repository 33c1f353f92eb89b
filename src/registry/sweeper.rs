//! # Scheduled Sweep
//!
//! Runs `EndpointRegistry::sweep` on a cron schedule in a background task.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use croner::Cron;
use tokio::task::JoinHandle;

use crate::observability::{log_event_with_fields, Event, MetricsRegistry};

use super::errors::{RegistryError, RegistryResult};
use super::registry::EndpointRegistry;

/// Parsed cron schedule for sweeps
pub struct SweepSchedule {
    expression: String,
    cron: Cron,
}

impl std::fmt::Debug for SweepSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepSchedule")
            .field("expression", &self.expression)
            .finish()
    }
}

impl SweepSchedule {
    /// Parse a five-field cron expression
    pub fn parse(expression: &str) -> RegistryResult<Self> {
        let cron = Cron::new(expression).parse().map_err(|e| {
            RegistryError::InvalidConfig(format!("Invalid sweep cron '{}': {}", expression, e))
        })?;
        Ok(Self {
            expression: expression.to_string(),
            cron,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Next run strictly after `after`
    pub fn next_after(&self, after: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.cron.find_next_occurrence(after, false).ok()
    }
}

/// Spawn the periodic sweep task.
///
/// The task sleeps until the next cron occurrence, sweeps, and repeats. It
/// exits if the schedule has no future occurrence.
pub fn spawn_sweeper(
    registry: EndpointRegistry,
    schedule: SweepSchedule,
    older_than_days: u32,
    metrics: Arc<MetricsRegistry>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let Some(next) = schedule.next_after(&now) else {
                return;
            };
            let next_str = next.to_rfc3339();
            log_event_with_fields(
                Event::SweepScheduled,
                &[("cron", schedule.expression()), ("next_run", next_str.as_str())],
            );

            let wait = (next - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            run_sweep(&registry, older_than_days, &metrics);
        }
    })
}

/// Run one sweep and log the outcome
pub fn run_sweep(
    registry: &EndpointRegistry,
    older_than_days: u32,
    metrics: &MetricsRegistry,
) -> Option<usize> {
    let days = older_than_days.to_string();
    match registry.sweep(older_than_days) {
        Ok(removed) => {
            metrics.add_endpoints_swept(removed as u64);
            let removed_str = removed.to_string();
            log_event_with_fields(
                Event::SweepComplete,
                &[("older_than_days", days.as_str()), ("removed", removed_str.as_str())],
            );
            Some(removed)
        }
        Err(e) => {
            let error = e.to_string();
            log_event_with_fields(
                Event::SweepFailed,
                &[("error", error.as_str()), ("older_than_days", days.as_str())],
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_parse_and_next() {
        let schedule = SweepSchedule::parse("0 3 * * *").unwrap();
        let from = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let next = schedule.next_after(&from).unwrap();

        assert_eq!(next.hour(), 3);
        assert_eq!(next.minute(), 0);
        assert!(next > from);
    }

    #[test]
    fn test_invalid_cron() {
        assert!(matches!(
            SweepSchedule::parse("not a cron"),
            Err(RegistryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_sweep_counts() {
        let registry = EndpointRegistry::in_memory();
        let metrics = MetricsRegistry::new();
        assert_eq!(run_sweep(&registry, 30, &metrics), Some(0));
        assert_eq!(metrics.snapshot().endpoints_swept, 0);
    }
}
