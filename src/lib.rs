// Veil - Dual-Agent Log Anonymization Pipeline
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

//! # Veil - dual-agent log anonymization pipeline
//!
//! Veil is a resumable, checkpointed streaming pipeline that reads raw
//! dual-agent log records, splits them into per-agent records, applies
//! privacy rules (field hiding, value substitution, field masking, ordered
//! transformation), and emits sanitized records. Progress is tracked through
//! a durable checkpoint so a crash or exception can be recovered from without
//! reprocessing already-committed data.
//!
//! ## Architecture
//!
//! Veil follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline orchestration (batching, stream driving, checkpoints)
//! - [`anonymization`] - Rule compilation and per-record processing
//! - [`adapters`] - External collaborators (record feed, PostgreSQL, state)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Data Flow
//!
//! ```text
//! StreamDriver -> RecordSplitter -> RuleEngine (hide, then substitute)
//!              -> TransformerChain -> sink write -> checkpoint commit
//! ```
//!
//! Control flows back only on failure, which rolls the checkpoint back to the
//! last committed value and stops the run; a supervising scheduler retries
//! later from the restored checkpoint.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use veil::adapters::postgresql::{PostgreSQLClient, PostgresCheckpointStore, PostgresRecordSink};
//! use veil::adapters::JsonlRecordSource;
//! use veil::anonymization::RuleCompiler;
//! use veil::config::load_config;
//! use veil::core::pipeline::{BatchProcessor, StreamDriver};
//! use veil::core::state::CheckpointManager;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("veil.toml")?;
//! let rules = Arc::new(RuleCompiler::compile_files(&config.anonymizer)?);
//!
//! let client = Arc::new(PostgreSQLClient::new(config.postgresql.clone())?);
//! let checkpoints = CheckpointManager::new_with_store(Arc::new(
//!     PostgresCheckpointStore::new(client.clone(), config.state.pipeline.clone()),
//! ));
//!
//! let start_cursor = checkpoints.load_or_default().await?;
//! let source = JsonlRecordSource::open(
//!     &config.source.path,
//!     &config.source.timestamp_field,
//!     rules.allowed_fields(),
//!     start_cursor,
//! )
//! .await?;
//!
//! let sink = Arc::new(PostgresRecordSink::new(client));
//! let processor = BatchProcessor::new(rules, sink, checkpoints);
//! let driver = StreamDriver::new(
//!     Box::new(source),
//!     processor,
//!     config.anonymizer.batch_size,
//!     config.source.record_limit,
//! );
//!
//! let summary = driver.run().await?;
//! println!("Committed {} records", summary.records_committed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Rule compilation failures ([`domain::ConfigParseError`]) are fatal at
//! startup. Batch failures ([`domain::BatchError`]) abort the containing
//! batch only: the whole batch is rolled back, the checkpoint is restored,
//! and the run stops reporting the records committed before the failure.
//! There is no per-record skip-and-continue.

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
