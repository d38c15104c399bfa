//! Adapter traits
//!
//! This module defines the interfaces the pipeline core depends on. The
//! source, sink and checkpoint store are external collaborators; the core
//! only assumes the contracts below.

use crate::domain::cursor::SourceCursor;
use crate::domain::errors::BatchError;
use crate::domain::record::{DualRecord, SingleAgentRecord};
use crate::domain::Result;
use async_trait::async_trait;

/// Lazy, restartable feed of dual records
///
/// Implementations expose a monotonically non-decreasing cursor reflecting the
/// records consumed so far, produce records filtered to the allowed-field
/// projection, and allow the cursor to be forcibly set on rollback.
#[async_trait]
pub trait RecordSource: Send {
    /// The cursor after the most recently consumed record
    fn cursor(&self) -> SourceCursor;

    /// Pull the next dual record, or `None` at end of stream
    ///
    /// Consuming a record advances the cursor to that record's timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Source`] if the feed cannot produce the next
    /// record; the containing batch fails.
    async fn next_record(&mut self) -> std::result::Result<Option<DualRecord>, BatchError>;

    /// Forcibly set the cursor (used on rollback)
    async fn set_cursor(&mut self, cursor: SourceCursor)
        -> std::result::Result<(), BatchError>;
}

/// Batched writer for sanitized records
///
/// The write must succeed or fail atomically for the whole list; the pipeline
/// invokes it at most once per batch, so there is never a partial write to
/// undo.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Write the full batch of sanitized records in one call
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::SinkWrite`] if the write fails; no record of the
    /// list may be considered committed in that case.
    async fn write_records(
        &self,
        records: Vec<SingleAgentRecord>,
    ) -> std::result::Result<(), BatchError>;
}

/// Durable storage for the checkpoint cursor
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Load the last committed cursor, or `None` if never committed
    async fn load(&self) -> Result<Option<SourceCursor>>;

    /// Persist the cursor, replacing any previous value
    async fn save(&self, cursor: SourceCursor) -> Result<()>;
}
