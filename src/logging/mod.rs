//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Leveled, event-tagged log records via `tracing`
//! - Configurable log levels
//! - Local JSON file logging with rotation
//!
//! Pipeline events carry an `event` field (`record_batch_committed`,
//! `record_batch_failed`, `checkpoint_restored`, ...) so runs can be followed
//! and alerted on without parsing message text.
//!
//! # Example
//!
//! ```no_run
//! use veil::logging::init_logging;
//! use veil::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(event = "run_started", "Pipeline run started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};
