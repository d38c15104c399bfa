//! Status command implementation
//!
//! Shows the current checkpoint so an operator can see how far the pipeline
//! has committed.

use crate::adapters::postgresql::{PostgreSQLClient, PostgresCheckpointStore};
use crate::adapters::traits::CheckpointStore;
use crate::adapters::FileCheckpointStore;
use crate::cli::exit_codes;
use crate::config::{load_config, CheckpointBackend};
use anyhow::Context;
use clap::Args;
use std::sync::Arc;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(exit_codes::CONFIG_ERROR);
            }
        };

        let store: Arc<dyn CheckpointStore> = match config.state.backend {
            CheckpointBackend::PostgreSQL => {
                let client = Arc::new(
                    PostgreSQLClient::new(config.postgresql.clone())
                        .context("failed to create PostgreSQL client")?,
                );
                Arc::new(PostgresCheckpointStore::new(
                    client,
                    config.state.pipeline.clone(),
                ))
            }
            CheckpointBackend::File => {
                let path = config
                    .state
                    .file_path
                    .as_deref()
                    .context("state.file_path is required for the file backend")?;
                Arc::new(FileCheckpointStore::new(path))
            }
        };

        println!("Pipeline: {}", config.state.pipeline);

        match store.load().await.context("failed to load checkpoint")? {
            Some(cursor) => {
                println!("Checkpoint: {cursor}");
                if let Some(timestamp) = cursor.as_datetime() {
                    println!("Committed through: {timestamp}");
                }
            }
            None => {
                println!("Checkpoint: none (pipeline has never committed)");
            }
        }

        Ok(exit_codes::SUCCESS)
    }
}
