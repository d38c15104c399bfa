//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Veil using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Process exit codes
pub mod exit_codes {
    /// Run finished without failure
    pub const SUCCESS: i32 = 0;

    /// Configuration or rule compilation failed; nothing was processed
    pub const CONFIG_ERROR: i32 = 2;

    /// A batch failed; the checkpoint was rolled back and the run stopped
    pub const RUN_ABORTED: i32 = 3;

    /// Unexpected fatal error
    pub const FATAL: i32 = 5;
}

/// Veil - dual-agent log anonymization pipeline
#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(version, about, long_about = None)]
#[command(author = "Veil Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "veil.toml", env = "VEIL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VEIL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the anonymization pipeline from the last checkpoint
    Run(commands::run::RunArgs),

    /// Validate configuration file and rule artifacts
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show the current checkpoint
    Status(commands::status::StatusArgs),
}
