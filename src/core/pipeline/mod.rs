//! Pipeline orchestration
//!
//! Batch accumulation and commit, and the stream driver's run loop. The flow
//! is strictly sequential: one batch is accumulated, processed and committed
//! before the next begins, and control flows back only on failure.

pub mod batch;
pub mod driver;

pub use batch::{Batch, BatchProcessor};
pub use driver::{RunSummary, StreamDriver};
