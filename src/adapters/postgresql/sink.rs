//! PostgreSQL record sink
//!
//! Writes a batch of sanitized records inside a single transaction so the
//! whole list commits or none of it does.

use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::traits::RecordSink;
use crate::domain::errors::BatchError;
use crate::domain::record::SingleAgentRecord;
use async_trait::async_trait;
use std::sync::Arc;

const INSERT_RECORD: &str =
    "INSERT INTO sanitized_records (agent, fields) VALUES ($1, $2)";

/// Sink writing sanitized records to the `sanitized_records` table
pub struct PostgresRecordSink {
    client: Arc<PostgreSQLClient>,
}

impl PostgresRecordSink {
    pub fn new(client: Arc<PostgreSQLClient>) -> Self {
        PostgresRecordSink { client }
    }
}

#[async_trait]
impl RecordSink for PostgresRecordSink {
    async fn write_records(
        &self,
        records: Vec<SingleAgentRecord>,
    ) -> Result<(), BatchError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut connection = self
            .client
            .get_connection()
            .await
            .map_err(|e| BatchError::SinkWrite(e.to_string()))?;

        let transaction = connection
            .transaction()
            .await
            .map_err(|e| BatchError::SinkWrite(format!("failed to begin transaction: {e}")))?;

        let statement = transaction
            .prepare(INSERT_RECORD)
            .await
            .map_err(|e| BatchError::SinkWrite(format!("failed to prepare insert: {e}")))?;

        for record in &records {
            transaction
                .execute(&statement, &[&record.agent().as_str(), &record.to_json()])
                .await
                .map_err(|e| BatchError::SinkWrite(format!("failed to insert record: {e}")))?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| BatchError::SinkWrite(format!("failed to commit batch: {e}")))?;

        tracing::debug!(records = records.len(), "Batch written to PostgreSQL");
        Ok(())
    }
}
