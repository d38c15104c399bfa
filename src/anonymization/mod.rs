//! Anonymization rules and per-record processing
//!
//! This module holds the privacy core of the pipeline:
//!
//! - [`compiler`] - compiles raw configuration artifacts into [`CompiledRules`]
//! - [`translation`] - field translation tables and the source projection
//! - [`masks`] - per-agent field value masks
//! - [`rules`] - hiding and substitution rules and their match predicate
//! - [`splitter`] - dual record to single-agent record splitting
//! - [`engine`] - hiding and substitution evaluation
//! - [`transformers`] - the ordered post-substitution transformer chain
//!
//! Everything here is pure with respect to I/O: records go in, records (or
//! nothing, for hidden records) come out. Batch orchestration and checkpoint
//! handling live in [`crate::core::pipeline`].

pub mod compiler;
pub mod engine;
pub mod masks;
pub mod rules;
pub mod splitter;
pub mod transformers;
pub mod translation;

pub use compiler::{CompiledRules, RuleCompiler};
pub use engine::RuleEngine;
pub use masks::FieldValueMasks;
pub use splitter::RecordSplitter;
pub use transformers::TransformerChain;
pub use translation::{AllowedFields, FieldTranslationTable};
