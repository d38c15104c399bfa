//! Record transformers
//!
//! A transformer is a pure record-to-record function applied after
//! substitution, in configured order. Transformers are selected by name from a
//! fixed registry at compile time; there is no runtime code generation. A
//! transformer failure is fatal to the containing batch.

use crate::domain::errors::{BatchError, ConfigParseError};
use crate::domain::record::SingleAgentRecord;
use serde_json::Value;
use std::sync::Arc;

/// Milliseconds in one hour, used for timestamp precision reduction
const HOUR_MILLIS: i64 = 3_600_000;

/// Duration fields clamped into the signed 32-bit range
const DURATION_FIELDS: [&str; 2] = ["totalDuration", "producerDurationProducerView"];

/// A pure record transformation selected by name from the registry
pub trait Transform: Send + Sync {
    /// The registry name this transformer is selected by
    fn name(&self) -> &'static str;

    /// Apply the transformation, returning the (possibly altered) record
    fn apply(&self, record: SingleAgentRecord) -> Result<SingleAgentRecord, BatchError>;
}

/// Truncates `requestInTs` to the start of its hour
///
/// Reduces the published timestamp precision so individual exchanges are
/// harder to correlate with external observations. Records without the field
/// pass through unchanged.
struct ReduceRequestInTsPrecision;

impl Transform for ReduceRequestInTsPrecision {
    fn name(&self) -> &'static str {
        "reduce_request_in_ts_precision"
    }

    fn apply(&self, mut record: SingleAgentRecord) -> Result<SingleAgentRecord, BatchError> {
        let Some(value) = record.get("requestInTs") else {
            return Ok(record);
        };
        if value.is_null() {
            return Ok(record);
        }

        let millis = value.as_i64().ok_or_else(|| {
            BatchError::RuleEvaluation(format!(
                "transformer '{}': requestInTs is not an integer timestamp: {value}",
                self.name()
            ))
        })?;

        record.insert(
            "requestInTs",
            Value::from(millis - millis.rem_euclid(HOUR_MILLIS)),
        );
        Ok(record)
    }
}

/// Clamps duration fields into the signed 32-bit integer range
///
/// `totalDuration` and `producerDurationProducerView` come from unvalidated
/// agent clocks and occasionally carry absurd values; downstream storage
/// expects 32-bit integers. Unparsable values are nulled rather than failing
/// the record, matching how the published schema treats them.
struct ForceDurationsToIntegerRange;

impl Transform for ForceDurationsToIntegerRange {
    fn name(&self) -> &'static str {
        "force_durations_to_integer_range"
    }

    fn apply(&self, mut record: SingleAgentRecord) -> Result<SingleAgentRecord, BatchError> {
        for field in DURATION_FIELDS {
            let Some(value) = record.get(field) else {
                continue;
            };
            if value.is_null() {
                continue;
            }

            let parsed = match value {
                Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };

            let clamped =
                parsed.map(|millis| millis.clamp(i64::from(i32::MIN), i64::from(i32::MAX)));

            match clamped {
                Some(millis) => record.insert(field, Value::from(millis)),
                None => record.insert(field, Value::Null),
            }
        }
        Ok(record)
    }
}

/// Look up a transformer by its registry name
fn lookup(name: &str) -> Option<Arc<dyn Transform>> {
    match name {
        "reduce_request_in_ts_precision" => Some(Arc::new(ReduceRequestInTsPrecision)),
        "force_durations_to_integer_range" => Some(Arc::new(ForceDurationsToIntegerRange)),
        _ => None,
    }
}

/// An ordered sequence of transformers applied after substitution
#[derive(Clone, Default)]
pub struct TransformerChain {
    transforms: Vec<Arc<dyn Transform>>,
}

impl TransformerChain {
    /// A chain that applies nothing
    pub fn empty() -> Self {
        TransformerChain::default()
    }

    /// Build a chain from enabled transformer names, preserving order
    ///
    /// # Errors
    ///
    /// Returns [`ConfigParseError::UnknownTransformer`] for any name not in
    /// the registry.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigParseError> {
        let transforms = names
            .iter()
            .map(|name| {
                lookup(name.as_ref()).ok_or_else(|| ConfigParseError::UnknownTransformer {
                    name: name.as_ref().to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TransformerChain { transforms })
    }

    /// Run the record through every transformer in order
    pub fn apply(&self, record: SingleAgentRecord) -> Result<SingleAgentRecord, BatchError> {
        self.transforms
            .iter()
            .try_fold(record, |record, transform| transform.apply(record))
    }

    /// The enabled transformer names, in application order
    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    /// Number of transformers in the chain
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether the chain applies nothing
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl std::fmt::Debug for TransformerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformerChain")
            .field("transforms", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Agent;
    use serde_json::json;

    fn record(fields: &[(&str, Value)]) -> SingleAgentRecord {
        let mut record = SingleAgentRecord::new(Agent::Client);
        for (field, value) in fields {
            record.insert(*field, value.clone());
        }
        record
    }

    #[test]
    fn test_unknown_transformer_name_fails_compile() {
        let err = TransformerChain::from_names(&["no_such_transformer"]).unwrap_err();
        assert!(matches!(err, ConfigParseError::UnknownTransformer { .. }));
    }

    #[test]
    fn test_chain_preserves_configured_order() {
        let chain = TransformerChain::from_names(&[
            "force_durations_to_integer_range",
            "reduce_request_in_ts_precision",
        ])
        .unwrap();

        assert_eq!(
            chain.names(),
            vec![
                "force_durations_to_integer_range",
                "reduce_request_in_ts_precision"
            ]
        );
    }

    #[test]
    fn test_reduce_request_in_ts_precision_truncates_to_hour() {
        let chain = TransformerChain::from_names(&["reduce_request_in_ts_precision"]).unwrap();

        // 2023-11-14T22:13:20Z -> 2023-11-14T22:00:00Z
        let rec = record(&[("requestInTs", json!(1_700_000_000_000_i64))]);
        let out = chain.apply(rec).unwrap();
        assert_eq!(out.get("requestInTs"), Some(&json!(1_699_999_200_000_i64)));
    }

    #[test]
    fn test_reduce_request_in_ts_precision_ignores_absent_field() {
        let chain = TransformerChain::from_names(&["reduce_request_in_ts_precision"]).unwrap();
        let rec = record(&[("serviceCode", json!("getSomething"))]);
        let out = chain.apply(rec.clone()).unwrap();
        assert_eq!(out, rec);
    }

    #[test]
    fn test_reduce_request_in_ts_precision_rejects_non_integer() {
        let chain = TransformerChain::from_names(&["reduce_request_in_ts_precision"]).unwrap();
        let rec = record(&[("requestInTs", json!("yesterday"))]);
        let err = chain.apply(rec).unwrap_err();
        assert!(matches!(err, BatchError::RuleEvaluation(_)));
    }

    #[test]
    fn test_force_durations_clamps_to_i32_range() {
        let chain = TransformerChain::from_names(&["force_durations_to_integer_range"]).unwrap();

        let rec = record(&[
            ("totalDuration", json!(10_000_000_000_i64)),
            ("producerDurationProducerView", json!(-10_000_000_000_i64)),
        ]);
        let out = chain.apply(rec).unwrap();

        assert_eq!(out.get("totalDuration"), Some(&json!(i32::MAX)));
        assert_eq!(
            out.get("producerDurationProducerView"),
            Some(&json!(i32::MIN))
        );
    }

    #[test]
    fn test_force_durations_parses_string_values() {
        let chain = TransformerChain::from_names(&["force_durations_to_integer_range"]).unwrap();
        let rec = record(&[("totalDuration", json!("1500"))]);
        let out = chain.apply(rec).unwrap();
        assert_eq!(out.get("totalDuration"), Some(&json!(1500)));
    }

    #[test]
    fn test_force_durations_nulls_unparsable_values() {
        let chain = TransformerChain::from_names(&["force_durations_to_integer_range"]).unwrap();
        let rec = record(&[("totalDuration", json!("fast"))]);
        let out = chain.apply(rec).unwrap();
        assert_eq!(out.get("totalDuration"), Some(&Value::Null));
    }

    #[test]
    fn test_force_durations_leaves_null_and_absent_untouched() {
        let chain = TransformerChain::from_names(&["force_durations_to_integer_range"]).unwrap();

        let rec = record(&[("totalDuration", Value::Null)]);
        let out = chain.apply(rec).unwrap();
        assert_eq!(out.get("totalDuration"), Some(&Value::Null));
        assert!(!out.contains_field("producerDurationProducerView"));
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = TransformerChain::empty();
        let rec = record(&[("requestInTs", json!("not even a timestamp"))]);
        let out = chain.apply(rec.clone()).unwrap();
        assert_eq!(out, rec);
    }
}
