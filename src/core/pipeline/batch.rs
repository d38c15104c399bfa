//! Batch processing
//!
//! A batch moves through `ACCUMULATING -> COMMITTING -> {COMMITTED,
//! ROLLED_BACK}`. Accumulation happens in the stream driver; this module owns
//! the committing side: run every dual record through splitting, hiding,
//! substitution and transformation, hand the complete surviving list to the
//! sink in one call, then advance the checkpoint to the batch's end cursor.
//! If any step fails the checkpoint is restored to the last committed value
//! instead — the sink is invoked at most once per batch, so there is never a
//! partial write to undo.

use crate::anonymization::compiler::CompiledRules;
use crate::anonymization::engine::RuleEngine;
use crate::anonymization::splitter::RecordSplitter;
use crate::anonymization::transformers::TransformerChain;
use crate::adapters::traits::RecordSink;
use crate::core::state::CheckpointManager;
use crate::domain::cursor::SourceCursor;
use crate::domain::errors::BatchError;
use crate::domain::record::{DualRecord, SingleAgentRecord};
use crate::domain::Result;
use std::sync::Arc;

/// A bounded, ordered sequence of dual records with its cursor observations
///
/// Transient: exists only for one processor invocation. The start cursor is
/// the source cursor observed at the first record; the end cursor is the
/// value observed after consuming the last record.
#[derive(Debug, Clone)]
pub struct Batch {
    records: Vec<DualRecord>,
    start_cursor: SourceCursor,
    end_cursor: SourceCursor,
}

impl Batch {
    pub fn new(
        records: Vec<DualRecord>,
        start_cursor: SourceCursor,
        end_cursor: SourceCursor,
    ) -> Self {
        Batch {
            records,
            start_cursor,
            end_cursor,
        }
    }

    /// The dual records in source order
    pub fn records(&self) -> &[DualRecord] {
        &self.records
    }

    /// Number of dual records in the batch
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cursor observed at the batch's first record
    pub fn start_cursor(&self) -> SourceCursor {
        self.start_cursor
    }

    /// Cursor observed after the batch's last record
    pub fn end_cursor(&self) -> SourceCursor {
        self.end_cursor
    }
}

/// Orchestrates one batch: split, hide, substitute, transform, write, commit
pub struct BatchProcessor {
    splitter: RecordSplitter,
    engine: RuleEngine,
    transformers: TransformerChain,
    sink: Arc<dyn RecordSink>,
    checkpoints: CheckpointManager,
}

impl BatchProcessor {
    /// Create a new batch processor
    pub fn new(
        rules: Arc<CompiledRules>,
        sink: Arc<dyn RecordSink>,
        checkpoints: CheckpointManager,
    ) -> Self {
        BatchProcessor {
            splitter: RecordSplitter::new(rules.clone()),
            engine: RuleEngine::new(rules.clone()),
            transformers: rules.transformers().clone(),
            sink,
            checkpoints,
        }
    }

    /// Commit a batch, returning the number of sanitized records written
    ///
    /// Output ordering is preserved: client before producer per dual record,
    /// source order across records.
    ///
    /// # Errors
    ///
    /// Returns the first batch-fatal error. The caller must roll the batch
    /// back via [`rollback`](Self::rollback); nothing is committed when this
    /// returns an error.
    pub async fn commit(&self, batch: &Batch) -> std::result::Result<usize, BatchError> {
        let sanitized = self.process_records(batch)?;
        let written = sanitized.len();

        self.sink.write_records(sanitized).await?;

        // The single awaited call between sink success and checkpoint
        // durability: a crash here resends this batch on the next run
        // (at-least-once).
        self.checkpoints
            .advance(batch.end_cursor())
            .await
            .map_err(|e| BatchError::Checkpoint(e.to_string()))?;

        tracing::info!(
            event = "record_batch_committed",
            records = batch.len(),
            written,
            range_start = %batch.start_cursor(),
            range_end = %batch.end_cursor(),
            "Record batch committed"
        );

        Ok(written)
    }

    /// Roll a failed batch back, restoring the last committed checkpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the checkpoint store itself cannot be written.
    pub async fn rollback(
        &self,
        batch: &Batch,
        error: &BatchError,
        last_committed: SourceCursor,
    ) -> Result<()> {
        tracing::error!(
            event = "record_batch_failed",
            range_start = %batch.start_cursor(),
            range_end = %batch.end_cursor(),
            restored_checkpoint = %last_committed,
            error = %error,
            "Record batch failed; checkpoint restored"
        );

        self.checkpoints.restore(last_committed).await
    }

    fn process_records(
        &self,
        batch: &Batch,
    ) -> std::result::Result<Vec<SingleAgentRecord>, BatchError> {
        let mut sanitized = Vec::new();

        for dual in batch.records() {
            for record in self.splitter.split(dual)? {
                if self.engine.should_hide(&record) {
                    continue;
                }

                let mut record = record;
                self.engine.substitute(&mut record);
                let record = self.transformers.apply(record)?;

                sanitized.push(record);
            }
        }

        Ok(sanitized)
    }
}
