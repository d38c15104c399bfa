//! Domain models and types for Veil.
//!
//! This module contains the core domain models, types, and business rules for
//! the anonymization pipeline.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Record models** ([`DualRecord`], [`SingleAgentRecord`], [`Agent`])
//! - **Stream position** ([`SourceCursor`])
//! - **Error types** ([`VeilError`], [`ConfigParseError`], [`BatchError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! Configuration compilation failures ([`ConfigParseError`]) are a distinct
//! type from batch-level failures ([`BatchError`]): the former are fatal to
//! process startup, the latter abort the containing batch, roll the checkpoint
//! back and stop the run.
//!
//! ```rust
//! use veil::domain::{Result, VeilError};
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     Err(VeilError::State("checkpoint store unavailable".to_string()))
//! }
//! ```

pub mod cursor;
pub mod errors;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use cursor::SourceCursor;
pub use errors::{BatchError, ConfigParseError, VeilError};
pub use record::{Agent, DualRecord, SingleAgentRecord};
pub use result::Result;
