//! File-backed checkpoint store
//!
//! Persists the checkpoint cursor as a small JSON document. The write goes
//! through a temporary file followed by a rename so a crash mid-write cannot
//! leave a torn checkpoint behind.

use crate::adapters::traits::CheckpointStore;
use crate::domain::cursor::SourceCursor;
use crate::domain::errors::VeilError;
use crate::domain::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointDocument {
    last_committed_cursor: SourceCursor,
}

/// Checkpoint store backed by a local JSON state file
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCheckpointStore { path: path.into() }
    }
}

#[async_trait]
impl CheckpointStore for FileCheckpointStore {
    async fn load(&self) -> Result<Option<SourceCursor>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(VeilError::State(format!(
                    "failed to read checkpoint file {}: {e}",
                    self.path.display()
                )))
            }
        };

        let document: CheckpointDocument = serde_json::from_str(&contents).map_err(|e| {
            VeilError::State(format!(
                "corrupt checkpoint file {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(Some(document.last_committed_cursor))
    }

    async fn save(&self, cursor: SourceCursor) -> Result<()> {
        let document = CheckpointDocument {
            last_committed_cursor: cursor,
        };
        let contents = serde_json::to_string_pretty(&document)
            .map_err(|e| VeilError::State(format!("failed to encode checkpoint: {e}")))?;

        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, contents).await.map_err(|e| {
            VeilError::State(format!(
                "failed to write checkpoint file {}: {e}",
                tmp_path.display()
            ))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            VeilError::State(format!(
                "failed to replace checkpoint file {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(())
    }
}
