//! External collaborator adapters
//!
//! This module holds the interfaces the pipeline core depends on and their
//! concrete implementations:
//!
//! - [`traits`] - the [`RecordSource`], [`RecordSink`] and [`CheckpointStore`]
//!   contracts
//! - [`jsonl`] - newline-delimited JSON record feed
//! - [`postgresql`] - pooled PostgreSQL sink and checkpoint store
//! - [`state`] - file-backed checkpoint store
//!
//! [`RecordSource`]: traits::RecordSource
//! [`RecordSink`]: traits::RecordSink
//! [`CheckpointStore`]: traits::CheckpointStore

pub mod jsonl;
pub mod postgresql;
pub mod state;
pub mod traits;

pub use jsonl::JsonlRecordSource;
pub use state::FileCheckpointStore;
pub use traits::{CheckpointStore, RecordSink, RecordSource};
