//! Shared in-memory test doubles for the pipeline integration tests

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use veil::adapters::traits::{CheckpointStore, RecordSink, RecordSource};
use veil::domain::cursor::SourceCursor;
use veil::domain::errors::{BatchError, VeilError};
use veil::domain::record::{DualRecord, SingleAgentRecord};

/// In-memory record source fed from a fixed list of (record, cursor) pairs
pub struct MemorySource {
    records: VecDeque<(DualRecord, SourceCursor)>,
    cursor: SourceCursor,
}

impl MemorySource {
    pub fn new(records: Vec<(Value, i64)>) -> Self {
        let records = records
            .into_iter()
            .map(|(value, ts)| {
                (
                    DualRecord::from_value(value).expect("test record must be an object"),
                    SourceCursor::from_millis(ts),
                )
            })
            .collect();
        MemorySource {
            records,
            cursor: SourceCursor::ZERO,
        }
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    fn cursor(&self) -> SourceCursor {
        self.cursor
    }

    async fn next_record(&mut self) -> Result<Option<DualRecord>, BatchError> {
        match self.records.pop_front() {
            Some((record, ts)) => {
                self.cursor = ts;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn set_cursor(&mut self, cursor: SourceCursor) -> Result<(), BatchError> {
        self.cursor = cursor;
        Ok(())
    }
}

/// In-memory sink recording every written record, with optional fail injection
pub struct MemorySink {
    written: Arc<Mutex<Vec<SingleAgentRecord>>>,
    calls: Mutex<usize>,
    fail_on_call: Option<usize>,
}

impl MemorySink {
    pub fn new() -> (Arc<Self>, Arc<Mutex<Vec<SingleAgentRecord>>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::new(MemorySink {
            written: written.clone(),
            calls: Mutex::new(0),
            fail_on_call: None,
        });
        (sink, written)
    }

    /// A sink whose n-th write call (1-based) fails
    pub fn failing_on(call: usize) -> (Arc<Self>, Arc<Mutex<Vec<SingleAgentRecord>>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::new(MemorySink {
            written: written.clone(),
            calls: Mutex::new(0),
            fail_on_call: Some(call),
        });
        (sink, written)
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn write_records(&self, records: Vec<SingleAgentRecord>) -> Result<(), BatchError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };

        if self.fail_on_call == Some(call) {
            return Err(BatchError::SinkWrite("injected sink failure".to_string()));
        }

        self.written.lock().unwrap().extend(records);
        Ok(())
    }
}

/// In-memory checkpoint store exposing its current value to assertions
pub struct MemoryCheckpointStore {
    value: Arc<Mutex<Option<SourceCursor>>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> (Arc<Self>, Arc<Mutex<Option<SourceCursor>>>) {
        let value = Arc::new(Mutex::new(None));
        let store = Arc::new(MemoryCheckpointStore {
            value: value.clone(),
        });
        (store, value)
    }

    pub fn with_cursor(cursor: i64) -> (Arc<Self>, Arc<Mutex<Option<SourceCursor>>>) {
        let value = Arc::new(Mutex::new(Some(SourceCursor::from_millis(cursor))));
        let store = Arc::new(MemoryCheckpointStore {
            value: value.clone(),
        });
        (store, value)
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn load(&self) -> Result<Option<SourceCursor>, VeilError> {
        Ok(*self.value.lock().unwrap())
    }

    async fn save(&self, cursor: SourceCursor) -> Result<(), VeilError> {
        *self.value.lock().unwrap() = Some(cursor);
        Ok(())
    }
}
