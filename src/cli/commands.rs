//! CLI command implementations

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use crate::fetcher::GoogleSheetsProvider;
use crate::http_server::{AppState, HttpServer, SharedState};
use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::registry::{spawn_sweeper, ConfigStore, EndpointRegistry, FileConfigStore, MemConfigStore};

use super::args::Command;
use super::config::{RegistryConfig, ServiceConfig};
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Placeholder printed instead of configured secrets
const REDACTED: &str = "********";

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config } => serve(&config),
        Command::Sweep { config, days } => sweep(&config, days),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Write a default configuration file; never overwrites
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized(config_path));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CliError::config_error(format!("Failed to create directory {:?}: {}", parent, e))
        })?;
    }

    let content = serde_json::to_string_pretty(&ServiceConfig::default())?;
    fs::write(config_path, content + "\n")?;

    write_response(json!({
        "initialized": true,
        "config": config_path.display().to_string(),
    }))
}

/// Load configuration, build the service and serve until interrupted
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = load_logged(config_path)?;
    let metrics = Arc::new(MetricsRegistry::new());
    let state = build_state(&config, Arc::clone(&metrics))?;
    let schedule = config.sweep_schedule()?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let sweeper = spawn_sweeper(
            state.registry.clone(),
            schedule,
            config.registry.sweep_after_days,
            metrics,
        );

        let result = HttpServer::new(state)
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)));

        sweeper.abort();
        result
    })
}

/// Run one sweep against the persistent store
pub fn sweep(config_path: &Path, days: Option<u32>) -> CliResult<()> {
    let config = load_logged(config_path)?;
    let store_path = config
        .registry
        .store_path
        .as_ref()
        .ok_or_else(CliError::no_persistent_store)?;

    let registry = EndpointRegistry::new(Arc::new(FileConfigStore::open(store_path)?));
    let older_than_days = days.unwrap_or(config.registry.sweep_after_days);
    let removed = registry.sweep(older_than_days)?;

    let days_str = older_than_days.to_string();
    let removed_str = removed.to_string();
    log_event_with_fields(
        Event::SweepComplete,
        &[("older_than_days", days_str.as_str()), ("removed", removed_str.as_str())],
    );

    write_response(json!({
        "removed": removed,
        "older_than_days": older_than_days,
        "remaining": registry.len()?,
    }))
}

/// Validate and print the effective configuration, secrets redacted
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = ServiceConfig::load(config_path)?;
    write_response(json!({
        "valid": true,
        "config": serde_json::to_value(redacted(config))?,
    }))
}

/// Build shared HTTP state from configuration
pub fn build_state(config: &ServiceConfig, metrics: Arc<MetricsRegistry>) -> CliResult<SharedState> {
    let registry = EndpointRegistry::new(open_store(&config.registry)?);
    let provider = GoogleSheetsProvider::new(&config.provider)
        .map_err(|e| CliError::boot_failed(format!("Failed to build provider client: {}", e)))?;

    Ok(AppState::new(config.api_settings()?, registry, Arc::new(provider), metrics).shared())
}

fn open_store(config: &RegistryConfig) -> CliResult<Arc<dyn ConfigStore>> {
    Ok(match &config.store_path {
        Some(path) => Arc::new(FileConfigStore::open(path)?),
        None => Arc::new(MemConfigStore::new()),
    })
}

fn load_logged(config_path: &Path) -> CliResult<ServiceConfig> {
    let config = ServiceConfig::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let path = config_path.display().to_string();
    let store = config
        .registry
        .store_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "memory".to_string());
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("path", path.as_str()), ("store", store.as_str())],
    );
    Ok(config)
}

fn redacted(mut config: ServiceConfig) -> ServiceConfig {
    for secret in [
        &mut config.provider.api_key,
        &mut config.provider.oauth_client_secret,
    ] {
        if secret.is_some() {
            *secret = Some(REDACTED.to_string());
        }
    }
    config
}
