//! PostgreSQL adapter
//!
//! Pooled client, sanitized-record sink and checkpoint store backed by the
//! sink database.

pub mod client;
pub mod sink;
pub mod state;

pub use client::PostgreSQLClient;
pub use sink::PostgresRecordSink;
pub use state::PostgresCheckpointStore;
