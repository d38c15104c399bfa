//! Stream driver
//!
//! Pulls dual records lazily from the source — one logical cursor, no
//! look-ahead past the active batch — accumulates them into batches bounded
//! by the configured size and drives the batch processor once per full (or
//! final partial) batch. On a batch failure the run stops: the checkpoint is
//! restored, the source cursor is forced back, and the summary reports how
//! many records committed before the failure so a supervising scheduler can
//! retry later from the restored checkpoint.

use crate::adapters::traits::RecordSource;
use crate::core::pipeline::batch::{Batch, BatchProcessor};
use crate::domain::cursor::SourceCursor;
use crate::domain::errors::BatchError;
use crate::domain::record::DualRecord;
use crate::domain::Result;

/// Outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Dual records committed before the run ended
    pub records_committed: usize,

    /// Batches fully committed
    pub batches_committed: usize,

    /// Sanitized single-agent records written to the sink
    pub records_written: usize,

    /// The checkpoint value at the end of the run
    pub last_committed_cursor: SourceCursor,

    /// The batch failure that stopped the run, if any
    pub failure: Option<String>,
}

impl RunSummary {
    fn new(start_cursor: SourceCursor) -> Self {
        RunSummary {
            records_committed: 0,
            batches_committed: 0,
            records_written: 0,
            last_committed_cursor: start_cursor,
            failure: None,
        }
    }

    /// Whether the run ended without a batch failure
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Drives the pipeline: pull, accumulate, commit, repeat
pub struct StreamDriver {
    source: Box<dyn RecordSource>,
    processor: BatchProcessor,
    batch_size: usize,
    record_limit: Option<usize>,
}

impl StreamDriver {
    /// Create a new stream driver
    ///
    /// `batch_size` is clamped to at least 1. `record_limit` optionally caps
    /// the dual records processed this run; it is checked before starting a
    /// new batch, never mid-batch.
    pub fn new(
        source: Box<dyn RecordSource>,
        processor: BatchProcessor,
        batch_size: usize,
        record_limit: Option<usize>,
    ) -> Self {
        StreamDriver {
            source,
            processor,
            batch_size: batch_size.max(1),
            record_limit,
        }
    }

    /// Run until the source is exhausted, the record limit is reached, or a
    /// batch fails
    ///
    /// # Errors
    ///
    /// Returns an error only when rollback itself fails (the checkpoint store
    /// cannot be written). A batch failure is reported through
    /// [`RunSummary::failure`], not as an `Err`.
    pub async fn run(mut self) -> Result<RunSummary> {
        let mut last_committed = self.source.cursor();
        let mut summary = RunSummary::new(last_committed);

        loop {
            if let Some(limit) = self.record_limit {
                if summary.records_committed >= limit {
                    tracing::info!(
                        event = "record_limit_reached",
                        limit,
                        "Record limit reached; stopping run"
                    );
                    break;
                }
            }

            let (records, start_cursor, exhausted) = match self.accumulate().await {
                Ok(accumulated) => accumulated,
                Err(error) => {
                    // The source failed mid-accumulation: nothing from this
                    // batch was committed, so only the in-memory cursor needs
                    // to be wound back.
                    tracing::error!(
                        event = "record_accumulation_failed",
                        last_checkpoint = %last_committed,
                        error = %error,
                        "Failed accumulating a record batch"
                    );
                    self.source.set_cursor(last_committed).await.ok();
                    summary.failure = Some(error.to_string());
                    break;
                }
            };

            if records.is_empty() {
                break;
            }

            let end_cursor = self.source.cursor();
            let batch = Batch::new(records, start_cursor, end_cursor);
            let batch_len = batch.len();

            match self.processor.commit(&batch).await {
                Ok(written) => {
                    summary.records_committed += batch_len;
                    summary.batches_committed += 1;
                    summary.records_written += written;
                    summary.last_committed_cursor = end_cursor;
                    last_committed = end_cursor;

                    tracing::info!(
                        event = "record_batch_anonymized",
                        total_records = summary.records_committed,
                        range_start = %batch.start_cursor(),
                        range_end = %batch.end_cursor(),
                        "{} records anonymized",
                        summary.records_committed
                    );
                }
                Err(error) => {
                    self.processor
                        .rollback(&batch, &error, last_committed)
                        .await?;
                    self.source.set_cursor(last_committed).await.ok();
                    summary.failure = Some(error.to_string());
                    break;
                }
            }

            if exhausted {
                break;
            }
        }

        Ok(summary)
    }

    /// Pull records until the batch is full or the source is exhausted
    ///
    /// Returns the records, the cursor observed at the first record, and
    /// whether the source ran dry.
    async fn accumulate(
        &mut self,
    ) -> std::result::Result<(Vec<DualRecord>, SourceCursor, bool), BatchError> {
        let mut records = Vec::with_capacity(self.batch_size);
        let mut start_cursor = self.source.cursor();
        let mut exhausted = false;

        while records.len() < self.batch_size {
            match self.source.next_record().await? {
                Some(record) => {
                    if records.is_empty() {
                        start_cursor = self.source.cursor();
                    }
                    records.push(record);
                }
                None => {
                    exhausted = true;
                    break;
                }
            }
        }

        Ok((records, start_cursor, exhausted))
    }
}
