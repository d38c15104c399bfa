//! Run command implementation
//!
//! Executes one pipeline run: compile the rule artifacts, wire the source,
//! sink and checkpoint store, and drive the stream until the feed is
//! exhausted, the record limit is reached, or a batch fails.

use crate::adapters::postgresql::{PostgreSQLClient, PostgresCheckpointStore, PostgresRecordSink};
use crate::adapters::traits::CheckpointStore;
use crate::adapters::{FileCheckpointStore, JsonlRecordSource};
use crate::anonymization::RuleCompiler;
use crate::cli::exit_codes;
use crate::config::{load_config, CheckpointBackend};
use crate::core::pipeline::{BatchProcessor, StreamDriver};
use crate::core::state::CheckpointManager;
use anyhow::Context;
use clap::Args;
use std::sync::Arc;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Maximum dual records to process this run (overrides source.record_limit)
    #[arg(long)]
    pub limit: Option<usize>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(exit_codes::CONFIG_ERROR);
            }
        };

        // Rule compilation failures are fatal to startup.
        let rules = match RuleCompiler::compile_files(&config.anonymizer) {
            Ok(rules) => Arc::new(rules),
            Err(e) => {
                tracing::error!(event = "rule_compilation_failed", error = %e);
                eprintln!("Rule compilation error: {e}");
                return Ok(exit_codes::CONFIG_ERROR);
            }
        };

        tracing::info!(
            event = "rules_compiled",
            translations = rules.translations().len(),
            hiding_rules = rules.hiding_rules().len(),
            substitution_rules = rules.substitution_rules().len(),
            transformers = ?rules.transformers().names(),
            "Rule artifacts compiled"
        );

        let client = Arc::new(
            PostgreSQLClient::new(config.postgresql.clone())
                .context("failed to create PostgreSQL client")?,
        );
        client
            .test_connection()
            .await
            .context("PostgreSQL connection test failed")?;
        client
            .ensure_schema_exists()
            .await
            .context("failed to initialize PostgreSQL schema")?;

        let store: Arc<dyn CheckpointStore> = match config.state.backend {
            CheckpointBackend::PostgreSQL => Arc::new(PostgresCheckpointStore::new(
                client.clone(),
                config.state.pipeline.clone(),
            )),
            CheckpointBackend::File => {
                let path = config
                    .state
                    .file_path
                    .as_deref()
                    .context("state.file_path is required for the file backend")?;
                Arc::new(FileCheckpointStore::new(path))
            }
        };
        let checkpoints = CheckpointManager::new_with_store(store);

        let start_cursor = checkpoints
            .load_or_default()
            .await
            .context("failed to load checkpoint")?;
        tracing::info!(
            event = "run_started",
            checkpoint = %start_cursor,
            batch_size = config.anonymizer.batch_size,
            "Resuming from checkpoint"
        );

        let source = JsonlRecordSource::open(
            &config.source.path,
            &config.source.timestamp_field,
            rules.allowed_fields(),
            start_cursor,
        )
        .await
        .context("failed to open record feed")?;

        let sink = Arc::new(PostgresRecordSink::new(client.clone()));
        let processor = BatchProcessor::new(rules, sink, checkpoints);

        let limit = self.limit.or(config.source.record_limit);
        let driver = StreamDriver::new(
            Box::new(source),
            processor,
            config.anonymizer.batch_size,
            limit,
        );

        let summary = driver.run().await.context("pipeline run failed")?;

        println!("Run finished");
        println!("  Records committed:  {}", summary.records_committed);
        println!("  Batches committed:  {}", summary.batches_committed);
        println!("  Records written:    {}", summary.records_written);
        println!("  Checkpoint:         {}", summary.last_committed_cursor);

        if let Some(failure) = &summary.failure {
            println!("  Stopped on failure: {failure}");
            return Ok(exit_codes::RUN_ABORTED);
        }

        Ok(exit_codes::SUCCESS)
    }
}
