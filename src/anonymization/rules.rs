//! Hiding and substitution rules
//!
//! Both rule kinds share one match predicate: a record matches a rule iff
//! every `(field, pattern)` condition finds its field present and its pattern
//! matching at the start of the value's string form. A missing field fails the
//! whole conjunction. Hiding is a disjunction over rule groups; substitution
//! rules fire independently, in declaration order, so later rules can
//! overwrite earlier substitutions.

use crate::domain::errors::ConfigParseError;
use crate::domain::record::SingleAgentRecord;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;

/// One `(field, pattern)` conjunct of a rule
#[derive(Debug, Clone)]
pub struct Condition {
    field: String,
    pattern: Regex,
}

impl Condition {
    /// Compile a condition from a field name and a pattern string
    ///
    /// # Errors
    ///
    /// Returns [`ConfigParseError::InvalidPattern`] if the pattern does not
    /// compile.
    pub fn new(field: impl Into<String>, pattern: &str) -> Result<Self, ConfigParseError> {
        let field = field.into();
        let pattern = Regex::new(pattern).map_err(|source| ConfigParseError::InvalidPattern {
            field: field.clone(),
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Condition { field, pattern })
    }

    /// The field this condition inspects
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Whether the pattern matches at the start of the value's string form
    pub fn matches_value(&self, value: &Value) -> bool {
        let text = value_as_text(value);
        self.pattern
            .find(text.as_ref())
            .map_or(false, |m| m.start() == 0)
    }

    /// Whether the condition holds for the record
    ///
    /// A record missing the field never matches, regardless of the pattern.
    pub fn matches_record(&self, record: &SingleAgentRecord) -> bool {
        record
            .get(&self.field)
            .map_or(false, |value| self.matches_value(value))
    }
}

/// String form used for pattern matching
///
/// Strings match unquoted; everything else matches its canonical JSON
/// rendering (`null`, `42`, `true`, ...).
fn value_as_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Evaluate a conjunctive condition list against a record
pub fn conditions_match(record: &SingleAgentRecord, conditions: &[Condition]) -> bool {
    conditions
        .iter()
        .all(|condition| condition.matches_record(record))
}

/// A conjunctive condition set that drops matching records entirely
#[derive(Debug, Clone)]
pub struct HidingRule {
    conditions: Vec<Condition>,
}

impl HidingRule {
    pub fn new(conditions: Vec<Condition>) -> Self {
        HidingRule { conditions }
    }

    /// Whether the record satisfies every condition of this rule
    pub fn matches(&self, record: &SingleAgentRecord) -> bool {
        conditions_match(record, &self.conditions)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

/// One field overwrite applied by a substitution rule
#[derive(Debug, Clone, PartialEq)]
pub struct Substitute {
    pub field: String,
    pub value: Value,
}

/// A conjunctive condition set paired with field overwrites
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    conditions: Vec<Condition>,
    substitutes: Vec<Substitute>,
}

impl SubstitutionRule {
    pub fn new(conditions: Vec<Condition>, substitutes: Vec<Substitute>) -> Self {
        SubstitutionRule {
            conditions,
            substitutes,
        }
    }

    /// Whether the record satisfies every condition of this rule
    pub fn matches(&self, record: &SingleAgentRecord) -> bool {
        conditions_match(record, &self.conditions)
    }

    /// Overwrite the configured fields with their literal replacement values
    pub fn apply(&self, record: &mut SingleAgentRecord) {
        for substitute in &self.substitutes {
            record.insert(substitute.field.clone(), substitute.value.clone());
        }
    }

    pub fn substitutes(&self) -> &[Substitute] {
        &self.substitutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Agent;
    use serde_json::json;
    use test_case::test_case;

    fn record(fields: &[(&str, Value)]) -> SingleAgentRecord {
        let mut record = SingleAgentRecord::new(Agent::Client);
        for (field, value) in fields {
            record.insert(*field, value.clone());
        }
        record
    }

    #[test_case("get", "getSomething", true ; "prefix at start matches")]
    #[test_case("get", "forgetSomething", false ; "mid string find does not count")]
    #[test_case("^getSomething$", "getSomething", true ; "fully anchored pattern")]
    #[test_case("", "anything", true ; "empty pattern matches everything")]
    #[test_case("thing$", "getSomething", false ; "suffix only is not a start match")]
    fn test_condition_matches_at_value_start(pattern: &str, value: &str, expected: bool) {
        let condition = Condition::new("serviceCode", pattern).unwrap();
        assert_eq!(
            condition.matches_record(&record(&[("serviceCode", json!(value))])),
            expected
        );
    }

    #[test]
    fn test_missing_field_never_matches() {
        let condition = Condition::new("serviceCode", ".*").unwrap();
        assert!(!condition.matches_record(&record(&[("otherField", json!("x"))])));
    }

    #[test]
    fn test_condition_matches_non_string_values() {
        let condition = Condition::new("succeeded", "^true$").unwrap();
        assert!(condition.matches_record(&record(&[("succeeded", json!(true))])));

        let condition = Condition::new("requestSize", "^14$").unwrap();
        assert!(condition.matches_record(&record(&[("requestSize", json!(14))])));

        let condition = Condition::new("faultCode", "^null$").unwrap();
        assert!(condition.matches_record(&record(&[("faultCode", Value::Null)])));
    }

    #[test]
    fn test_invalid_pattern_is_a_parse_error() {
        let err = Condition::new("serviceCode", "([unclosed").unwrap_err();
        assert!(matches!(err, ConfigParseError::InvalidPattern { .. }));
    }

    #[test]
    fn test_conjunction_requires_all_conditions() {
        let conditions = vec![
            Condition::new("clientMemberCode", "^100").unwrap(),
            Condition::new("serviceCode", "^get").unwrap(),
        ];

        let matching = record(&[
            ("clientMemberCode", json!("10012345")),
            ("serviceCode", json!("getSomething")),
        ]);
        assert!(conditions_match(&matching, &conditions));

        let partial = record(&[("clientMemberCode", json!("10012345"))]);
        assert!(!conditions_match(&partial, &conditions));
    }

    #[test]
    fn test_substitution_rule_overwrites_fields() {
        let rule = SubstitutionRule::new(
            vec![Condition::new("clientMemberCode", "^100$").unwrap()],
            vec![Substitute {
                field: "clientMemberCode".to_string(),
                value: json!("hidden"),
            }],
        );

        let mut rec = record(&[("clientMemberCode", json!("100"))]);
        assert!(rule.matches(&rec));
        rule.apply(&mut rec);
        assert_eq!(rec.get("clientMemberCode"), Some(&json!("hidden")));
    }

    #[test]
    fn test_substitution_can_introduce_new_field() {
        let rule = SubstitutionRule::new(
            vec![Condition::new("serviceCode", "^get").unwrap()],
            vec![Substitute {
                field: "redacted".to_string(),
                value: json!(true),
            }],
        );

        let mut rec = record(&[("serviceCode", json!("getSomething"))]);
        rule.apply(&mut rec);
        assert_eq!(rec.get("redacted"), Some(&json!(true)));
    }
}
