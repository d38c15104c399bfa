//! Configuration management for Veil.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Veil uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for optional settings
//! - Comprehensive validation
//! - Type-safe configuration structs
//!
//! The anonymization rule artifacts (translation list, rule document, field
//! metadata) are *referenced* from the configuration but compiled separately
//! by [`crate::anonymization::RuleCompiler`]; only the resulting compiled
//! structures flow into the pipeline.
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [anonymizer]
//! field_translations_file = "cfg/field_translations.list"
//! field_data_file = "cfg/field_data.yaml"
//! rules_file = "cfg/rules.yaml"
//! transformers = ["reduce_request_in_ts_precision", "force_durations_to_integer_range"]
//! batch_size = 1000
//!
//! [source]
//! path = "records.jsonl"
//! timestamp_field = "correctorTime"
//!
//! [postgresql]
//! connection_string = "${VEIL_POSTGRES_DSN}"
//!
//! [state]
//! backend = "postgresql"
//! pipeline = "veil"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    AnonymizerConfig, ApplicationConfig, CheckpointBackend, LoggingConfig, PostgreSQLConfig,
    SourceConfig, StateConfig, VeilConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
