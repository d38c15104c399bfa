//! PostgreSQL checkpoint store
//!
//! Persists the checkpoint cursor in the `anonymizer_state` table, keyed by
//! pipeline name, so the sink database carries the pipeline's own progress.

use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::traits::CheckpointStore;
use crate::domain::cursor::SourceCursor;
use crate::domain::{Result, VeilError};
use async_trait::async_trait;
use std::sync::Arc;

const SELECT_CURSOR: &str =
    "SELECT last_committed_cursor FROM anonymizer_state WHERE pipeline = $1";

const UPSERT_CURSOR: &str = "\
INSERT INTO anonymizer_state (pipeline, last_committed_cursor, updated_at)
VALUES ($1, $2, now())
ON CONFLICT (pipeline)
DO UPDATE SET last_committed_cursor = EXCLUDED.last_committed_cursor, updated_at = now()";

/// Checkpoint store backed by the sink database
pub struct PostgresCheckpointStore {
    client: Arc<PostgreSQLClient>,
    pipeline: String,
}

impl PostgresCheckpointStore {
    pub fn new(client: Arc<PostgreSQLClient>, pipeline: impl Into<String>) -> Self {
        PostgresCheckpointStore {
            client,
            pipeline: pipeline.into(),
        }
    }
}

#[async_trait]
impl CheckpointStore for PostgresCheckpointStore {
    async fn load(&self) -> Result<Option<SourceCursor>> {
        let connection = self.client.get_connection().await?;

        let row = connection
            .query_opt(SELECT_CURSOR, &[&self.pipeline])
            .await
            .map_err(|e| VeilError::State(format!("failed to load checkpoint: {e}")))?;

        Ok(row.map(|row| SourceCursor::from_millis(row.get::<_, i64>(0))))
    }

    async fn save(&self, cursor: SourceCursor) -> Result<()> {
        let connection = self.client.get_connection().await?;

        connection
            .execute(UPSERT_CURSOR, &[&self.pipeline, &cursor.as_millis()])
            .await
            .map_err(|e| VeilError::State(format!("failed to save checkpoint: {e}")))?;

        Ok(())
    }
}
