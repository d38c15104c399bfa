//! Domain error types
//!
//! This module defines the error hierarchy for Veil. Configuration parsing
//! failures are a distinct type from batch-level failures so that callers are
//! forced to handle "do not start the process" separately from "abort this
//! batch and roll back". All errors are domain-specific and don't expose
//! third-party types.

use crate::domain::record::Agent;
use std::path::PathBuf;
use thiserror::Error;

/// Main Veil error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum VeilError {
    /// Configuration-related errors (file loading, schema validation)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Rule/translation/mask/transformer compilation errors
    ///
    /// Fatal at startup: the process must not proceed past a failed compile.
    #[error("Rule compilation error: {0}")]
    RuleCompile(#[from] ConfigParseError),

    /// Batch processing errors
    ///
    /// Fatal to the containing batch only: the batch is rolled back and the
    /// run stops, but the restored checkpoint allows a later retry.
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// State management errors
    #[error("State management error: {0}")]
    State(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while compiling raw configuration artifacts
///
/// Raised by the rule compiler for malformed translation lines, bad regex
/// patterns, unknown transformer names and malformed rule or field-metadata
/// documents. Any of these is fatal to process startup.
#[derive(Debug, Error)]
pub enum ConfigParseError {
    /// A translation line did not split into exactly one "original -> new" pair
    #[error("translation line {line_no} is not a single 'original -> new' pair: '{line}'")]
    MalformedTranslationLine { line_no: usize, line: String },

    /// A translation source had more than two dot-separated path segments
    #[error("translation source '{original}' has more than two path segments")]
    TooManyPathSegments { original: String },

    /// A two-segment translation source named something other than an agent
    #[error("translation source '{original}' names unknown agent '{agent}'")]
    UnknownAgent { original: String, agent: String },

    /// A rule condition pattern failed to compile
    #[error("invalid pattern '{pattern}' for field '{field}'")]
    InvalidPattern {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A requested transformer name is not in the registry
    #[error("unknown transformer '{name}'")]
    UnknownTransformer { name: String },

    /// The rule document could not be parsed
    #[error("malformed rule document: {0}")]
    InvalidRuleDocument(String),

    /// The field-metadata document could not be parsed
    #[error("malformed field metadata: {0}")]
    InvalidFieldMetadata(String),

    /// A field-metadata entry named something other than an agent
    #[error("field '{field}' names unknown agent '{agent}'")]
    InvalidFieldAgent { field: String, agent: String },

    /// A configuration artifact could not be read
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort the containing batch
///
/// Every variant is batch-fatal: the batch is rolled back, the checkpoint is
/// restored to the last committed value, and the run stops. There is no
/// per-record skip-and-continue.
#[derive(Debug, Error)]
pub enum BatchError {
    /// A record field had no entry in its agent's translation table
    #[error("no translation entry for {agent} field '{field}'")]
    UntranslatedField { agent: Agent, field: String },

    /// A shared top-level field had no entry in the shared translation table
    #[error("no translation entry for shared field '{field}'")]
    UntranslatedSharedField { field: String },

    /// Rule evaluation or transformation failed for a record
    #[error("rule evaluation failed: {0}")]
    RuleEvaluation(String),

    /// The sink rejected the batched write
    #[error("sink write failed: {0}")]
    SinkWrite(String),

    /// The source failed while producing the next record
    #[error("source read failed: {0}")]
    Source(String),

    /// The checkpoint could not be advanced or restored
    #[error("checkpoint update failed: {0}")]
    Checkpoint(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for VeilError {
    fn from(err: std::io::Error) -> Self {
        VeilError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for VeilError {
    fn from(err: serde_json::Error) -> Self {
        VeilError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for VeilError {
    fn from(err: toml::de::Error) -> Self {
        VeilError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_veil_error_display() {
        let err = VeilError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_config_parse_error_conversion() {
        let parse_err = ConfigParseError::UnknownTransformer {
            name: "bogus".to_string(),
        };
        let veil_err: VeilError = parse_err.into();
        assert!(matches!(veil_err, VeilError::RuleCompile(_)));
    }

    #[test]
    fn test_batch_error_conversion() {
        let batch_err = BatchError::SinkWrite("connection reset".to_string());
        let veil_err: VeilError = batch_err.into();
        assert!(matches!(veil_err, VeilError::Batch(_)));
    }

    #[test]
    fn test_untranslated_field_display() {
        let err = BatchError::UntranslatedField {
            agent: Agent::Client,
            field: "securityServerType".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no translation entry for client field 'securityServerType'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let veil_err: VeilError = io_err.into();
        assert!(matches!(veil_err, VeilError::Io(_)));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = VeilError::State("test".to_string());
        let _: &dyn std::error::Error = &err;

        let err = ConfigParseError::InvalidRuleDocument("test".to_string());
        let _: &dyn std::error::Error = &err;

        let err = BatchError::RuleEvaluation("test".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
