//! Newline-delimited JSON record source
//!
//! Reads dual records from a JSONL feed file, one JSON object per line. Each
//! record must carry the configured timestamp field (epoch milliseconds),
//! which becomes the source cursor. Records at or before the starting cursor
//! are skipped, making the feed restartable from a checkpoint; everything else
//! is projected down to the allowed fields before entering the pipeline.

use crate::adapters::traits::RecordSource;
use crate::anonymization::translation::AllowedFields;
use crate::domain::cursor::SourceCursor;
use crate::domain::errors::BatchError;
use crate::domain::record::DualRecord;
use crate::domain::Result;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

/// JSONL-backed record source
pub struct JsonlRecordSource {
    lines: Lines<BufReader<File>>,
    allowed: AllowedFields,
    timestamp_field: String,
    cursor: SourceCursor,
    start_after: SourceCursor,
}

impl JsonlRecordSource {
    /// Open a feed file, resuming after the given cursor
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub async fn open(
        path: impl AsRef<Path>,
        timestamp_field: impl Into<String>,
        allowed: AllowedFields,
        start_after: SourceCursor,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).await.map_err(|e| {
            crate::domain::VeilError::Io(format!(
                "failed to open record feed {}: {e}",
                path.display()
            ))
        })?;

        Ok(JsonlRecordSource {
            lines: BufReader::new(file).lines(),
            allowed,
            timestamp_field: timestamp_field.into(),
            cursor: start_after,
            start_after,
        })
    }

    fn parse_line(&self, line: &str) -> std::result::Result<(DualRecord, SourceCursor), BatchError> {
        let value: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| BatchError::Source(format!("malformed feed line: {e}")))?;

        let record = DualRecord::from_value(value)
            .map_err(|_| BatchError::Source("feed line is not a JSON object".to_string()))?;

        let timestamp = record
            .get(&self.timestamp_field)
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| {
                BatchError::Source(format!(
                    "record is missing integer timestamp field '{}'",
                    self.timestamp_field
                ))
            })?;

        Ok((record, SourceCursor::from_millis(timestamp)))
    }
}

#[async_trait]
impl RecordSource for JsonlRecordSource {
    fn cursor(&self) -> SourceCursor {
        self.cursor
    }

    async fn next_record(&mut self) -> std::result::Result<Option<DualRecord>, BatchError> {
        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|e| BatchError::Source(format!("failed to read feed line: {e}")))?;

            let Some(line) = line else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                continue;
            }

            let (record, timestamp) = self.parse_line(&line)?;

            // Already-committed records are skipped on restart.
            if timestamp <= self.start_after {
                continue;
            }

            self.cursor = self.cursor.max(timestamp);
            return Ok(Some(self.allowed.project(&record)));
        }
    }

    async fn set_cursor(
        &mut self,
        cursor: SourceCursor,
    ) -> std::result::Result<(), BatchError> {
        self.cursor = cursor;
        Ok(())
    }
}
