//! Record models
//!
//! A dual record is one retrieved unit containing up to two agent-perspective
//! sub-records (`client`, `producer`) of the same logged exchange, plus shared
//! top-level fields. Splitting produces per-agent flat records that flow
//! through hiding, substitution and transformation before reaching the sink.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Either endpoint role of a logged exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agent {
    /// The calling side of the exchange
    Client,
    /// The serving side of the exchange
    Producer,
}

impl Agent {
    /// Both agents in split-emission order: client first, then producer
    pub const ALL: [Agent; 2] = [Agent::Client, Agent::Producer];

    /// The agent's string form as it appears in source records
    pub fn as_str(&self) -> &'static str {
        match self {
            Agent::Client => "client",
            Agent::Producer => "producer",
        }
    }

    /// The opposite endpoint role
    pub fn other(&self) -> Agent {
        match self {
            Agent::Client => Agent::Producer,
            Agent::Producer => Agent::Client,
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Agent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Agent::Client),
            "producer" => Ok(Agent::Producer),
            other => Err(format!("unknown agent '{other}'")),
        }
    }
}

/// One retrieved source unit: up to two agent sub-records plus shared fields
///
/// Immutable once read from the source. The wrapped JSON object may contain a
/// `client` and/or `producer` sub-object; every other top-level key is a
/// shared field (e.g. the timestamp and the unique identifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DualRecord(Map<String, Value>);

impl DualRecord {
    /// Wrap a parsed JSON object as a dual record
    pub fn new(fields: Map<String, Value>) -> Self {
        DualRecord(fields)
    }

    /// Build a dual record from an arbitrary JSON value
    ///
    /// # Errors
    ///
    /// Returns the value back if it is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Object(map) => Ok(DualRecord(map)),
            other => Err(other),
        }
    }

    /// The agent's sub-record, if this unit carries that perspective
    pub fn agent_section(&self, agent: Agent) -> Option<&Map<String, Value>> {
        self.0.get(agent.as_str()).and_then(Value::as_object)
    }

    /// Whether this unit carries the given agent's perspective
    pub fn has_agent(&self, agent: Agent) -> bool {
        self.agent_section(agent).is_some()
    }

    /// Shared top-level fields (everything except the agent sub-records)
    pub fn shared_fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0
            .iter()
            .filter(|(key, _)| Agent::from_str(key).is_err())
    }

    /// A top-level field by name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// A single-agent record after splitting
///
/// Flat mapping from translated field name to value, tagged with the agent it
/// was extracted for. Mutated in place by substitution and replaced by
/// transformers; destroyed once handed to the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleAgentRecord {
    agent: Agent,
    fields: BTreeMap<String, Value>,
}

impl SingleAgentRecord {
    /// Create an empty record for the given agent
    pub fn new(agent: Agent) -> Self {
        SingleAgentRecord {
            agent,
            fields: BTreeMap::new(),
        }
    }

    /// The agent this record was extracted for
    pub fn agent(&self) -> Agent {
        self.agent
    }

    /// Set a field, replacing any previous value
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    /// A field value by translated name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether the record carries the field at all (null counts as present)
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterate over fields in name order
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The record's fields as a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dual(value: Value) -> DualRecord {
        DualRecord::from_value(value).expect("object")
    }

    #[test]
    fn test_agent_string_forms() {
        assert_eq!(Agent::Client.as_str(), "client");
        assert_eq!(Agent::Producer.as_str(), "producer");
        assert_eq!("client".parse::<Agent>().unwrap(), Agent::Client);
        assert!("monitor".parse::<Agent>().is_err());
    }

    #[test]
    fn test_agent_other() {
        assert_eq!(Agent::Client.other(), Agent::Producer);
        assert_eq!(Agent::Producer.other(), Agent::Client);
    }

    #[test]
    fn test_dual_record_sections() {
        let record = dual(json!({
            "client": {"serviceCode": "getSomething"},
            "requestInTs": 1_700_000_000_000_i64
        }));

        assert!(record.has_agent(Agent::Client));
        assert!(!record.has_agent(Agent::Producer));
        assert_eq!(
            record
                .agent_section(Agent::Client)
                .unwrap()
                .get("serviceCode"),
            Some(&json!("getSomething"))
        );
        assert!(record.agent_section(Agent::Producer).is_none());
    }

    #[test]
    fn test_dual_record_shared_fields_skip_agents() {
        let record = dual(json!({
            "client": {"a": 1},
            "producer": {"a": 2},
            "requestInTs": 100,
            "messageId": "abc"
        }));

        let shared: Vec<&String> = record.shared_fields().map(|(k, _)| k).collect();
        assert_eq!(shared.len(), 2);
        assert!(shared.iter().any(|k| *k == "requestInTs"));
        assert!(shared.iter().any(|k| *k == "messageId"));
    }

    #[test]
    fn test_dual_record_from_non_object() {
        assert!(DualRecord::from_value(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_single_agent_record_roundtrip() {
        let mut record = SingleAgentRecord::new(Agent::Producer);
        record.insert("serviceCode", json!("getSomething"));
        record.insert("requestInTs", json!(100));

        assert_eq!(record.agent(), Agent::Producer);
        assert_eq!(record.len(), 2);
        assert!(record.contains_field("serviceCode"));
        assert_eq!(
            record.to_json(),
            json!({"requestInTs": 100, "serviceCode": "getSomething"})
        );
    }

    #[test]
    fn test_single_agent_record_null_field_is_present() {
        let mut record = SingleAgentRecord::new(Agent::Client);
        record.insert("representedPartyCode", Value::Null);

        assert!(record.contains_field("representedPartyCode"));
        assert_eq!(record.get("representedPartyCode"), Some(&Value::Null));
    }
}
