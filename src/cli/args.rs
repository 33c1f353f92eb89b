//! CLI argument definitions using clap
//!
//! Commands:
//! - sheetapi init --config <path>
//! - sheetapi serve --config <path>
//! - sheetapi sweep --config <path> [--days N]
//! - sheetapi check-config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "./sheetapi.json";

/// sheetapi - serve spreadsheet tabs as JSON APIs
#[derive(Parser, Debug)]
#[command(name = "sheetapi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Remove generated APIs unused for a number of days and exit
    Sweep {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Idle threshold in days (default: registry.sweep_after_days)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Validate the configuration and print the effective values
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
