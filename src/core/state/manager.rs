//! Checkpoint manager
//!
//! Wraps the checkpoint store behind commit semantics: the cursor is advanced
//! only after a batch has fully committed, and explicitly restored to the last
//! committed value when a batch fails. The manager is the checkpoint's only
//! writer.

use crate::adapters::traits::CheckpointStore;
use crate::domain::cursor::SourceCursor;
use crate::domain::Result;
use std::sync::Arc;

/// Manages loading, advancing and restoring the checkpoint cursor
#[derive(Clone)]
pub struct CheckpointManager {
    /// Checkpoint storage backend
    store: Arc<dyn CheckpointStore>,
}

impl CheckpointManager {
    /// Create a new CheckpointManager with a storage backend
    pub fn new_with_store(store: Arc<dyn CheckpointStore>) -> Self {
        Self { store }
    }

    /// Load the last committed cursor, or [`SourceCursor::ZERO`] on first run
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn load_or_default(&self) -> Result<SourceCursor> {
        Ok(self.store.load().await?.unwrap_or(SourceCursor::ZERO))
    }

    /// Advance the checkpoint after a fully committed batch
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn advance(&self, cursor: SourceCursor) -> Result<()> {
        tracing::info!(
            event = "checkpoint_advanced",
            cursor = %cursor,
            "Checkpoint advanced"
        );

        self.store.save(cursor).await
    }

    /// Restore the checkpoint to the last committed value after a failed batch
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn restore(&self, cursor: SourceCursor) -> Result<()> {
        tracing::warn!(
            event = "checkpoint_restored",
            cursor = %cursor,
            "Checkpoint restored after failed batch"
        );

        self.store.save(cursor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::state::FileCheckpointStore;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_defaults_to_zero() {
        let dir = tempdir().unwrap();
        let manager = CheckpointManager::new_with_store(Arc::new(FileCheckpointStore::new(
            dir.path().join("checkpoint.json"),
        )));

        assert_eq!(manager.load_or_default().await.unwrap(), SourceCursor::ZERO);
    }

    #[tokio::test]
    async fn test_advance_then_restore() {
        let dir = tempdir().unwrap();
        let manager = CheckpointManager::new_with_store(Arc::new(FileCheckpointStore::new(
            dir.path().join("checkpoint.json"),
        )));

        manager.advance(SourceCursor::from_millis(200)).await.unwrap();
        assert_eq!(
            manager.load_or_default().await.unwrap(),
            SourceCursor::from_millis(200)
        );

        manager.restore(SourceCursor::from_millis(100)).await.unwrap();
        assert_eq!(
            manager.load_or_default().await.unwrap(),
            SourceCursor::from_millis(100)
        );
    }
}
