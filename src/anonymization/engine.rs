//! Rule engine
//!
//! Evaluates the compiled hiding and substitution rules against single-agent
//! records. Hiding drops a record when it fully satisfies at least one rule
//! group; substitution mutates a surviving record in place, applying every
//! matching rule in declaration order so later rules can overwrite earlier
//! substitutions.

use crate::anonymization::compiler::CompiledRules;
use crate::domain::record::SingleAgentRecord;
use std::sync::Arc;

/// Evaluates hiding and substitution rules against single-agent records
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Arc<CompiledRules>,
}

impl RuleEngine {
    pub fn new(rules: Arc<CompiledRules>) -> Self {
        RuleEngine { rules }
    }

    /// Whether the record must be dropped from the output
    ///
    /// A record is hidden iff it satisfies every condition of at least one
    /// hiding rule.
    pub fn should_hide(&self, record: &SingleAgentRecord) -> bool {
        self.rules
            .hiding_rules()
            .iter()
            .any(|rule| rule.matches(record))
    }

    /// Apply every matching substitution rule, in declaration order
    pub fn substitute(&self, record: &mut SingleAgentRecord) {
        for rule in self.rules.substitution_rules() {
            if rule.matches(record) {
                rule.apply(record);
            }
        }
    }
}
