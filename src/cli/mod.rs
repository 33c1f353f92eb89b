//! CLI module for sheetapi
//!
//! Provides command-line interface for:
//! - init: Write a default configuration file
//! - serve: Run the HTTP server and periodic sweep
//! - sweep: One-shot removal of idle generated APIs
//! - check-config: Validate and print the configuration

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, DEFAULT_CONFIG_PATH};
pub use commands::{build_state, check_config, init, run, run_command, serve, sweep};
pub use config::{CacheConfig, RegistryConfig, ServiceConfig};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_response;
