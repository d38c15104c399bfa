//! Field value masks
//!
//! A mask forces a field to null in one agent's output regardless of what the
//! source carried. Masks are derived from the field-metadata artifact: a field
//! owned by one agent is masked in the *other* agent's published record, so an
//! agent never leaks its counterpart's private measurements.
//!
//! The artifact is a YAML document:
//!
//! ```yaml
//! fields:
//!   requestSize:
//!     agent: client
//!   responseSize:
//!     agent: producer
//!   messageId: {}
//! ```

use crate::domain::errors::ConfigParseError;
use crate::domain::record::Agent;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
struct RawFieldMetadata {
    fields: BTreeMap<String, RawFieldEntry>,
}

#[derive(Debug, Deserialize)]
struct RawFieldEntry {
    agent: Option<String>,
}

/// Per-agent sets of translated field names that are always nulled
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValueMasks {
    client: BTreeSet<String>,
    producer: BTreeSet<String>,
}

impl FieldValueMasks {
    /// Derive masks from the YAML field-metadata artifact
    ///
    /// Fields without an `agent` key are shared and never masked.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigParseError`] if the document is not valid YAML of the
    /// expected shape, or an entry names an unknown agent.
    pub fn parse(text: &str) -> Result<Self, ConfigParseError> {
        let raw: RawFieldMetadata = serde_yaml::from_str(text)
            .map_err(|e| ConfigParseError::InvalidFieldMetadata(e.to_string()))?;

        let mut masks = FieldValueMasks::default();
        for (field, entry) in raw.fields {
            let Some(agent) = entry.agent else {
                continue;
            };
            let owner = Agent::from_str(&agent).map_err(|_| ConfigParseError::InvalidFieldAgent {
                field: field.clone(),
                agent,
            })?;
            // The owning agent keeps the value; the counterpart gets null.
            match owner.other() {
                Agent::Client => masks.client.insert(field),
                Agent::Producer => masks.producer.insert(field),
            };
        }

        Ok(masks)
    }

    /// Read and parse the field-metadata artifact from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigParseError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Build masks directly from per-agent field sets
    pub fn from_sets(client: BTreeSet<String>, producer: BTreeSet<String>) -> Self {
        FieldValueMasks { client, producer }
    }

    /// The masked field names for one agent's output
    pub fn masked_fields(&self, agent: Agent) -> &BTreeSet<String> {
        match agent {
            Agent::Client => &self.client,
            Agent::Producer => &self.producer,
        }
    }

    /// Whether no field is masked for either agent
    pub fn is_empty(&self) -> bool {
        self.client.is_empty() && self.producer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
fields:
  requestSize:
    agent: client
  responseSize:
    agent: producer
  messageId: {}
";

    #[test]
    fn test_masks_target_opposite_agent() {
        let masks = FieldValueMasks::parse(SAMPLE).unwrap();

        // requestSize belongs to the client, so the producer's output masks it.
        assert!(masks.masked_fields(Agent::Producer).contains("requestSize"));
        assert!(!masks.masked_fields(Agent::Client).contains("requestSize"));

        // responseSize belongs to the producer, so the client's output masks it.
        assert!(masks.masked_fields(Agent::Client).contains("responseSize"));
        assert!(!masks
            .masked_fields(Agent::Producer)
            .contains("responseSize"));
    }

    #[test]
    fn test_fields_without_agent_are_not_masked() {
        let masks = FieldValueMasks::parse(SAMPLE).unwrap();
        assert!(!masks.masked_fields(Agent::Client).contains("messageId"));
        assert!(!masks.masked_fields(Agent::Producer).contains("messageId"));
    }

    #[test]
    fn test_unknown_agent_is_a_parse_error() {
        let doc = "fields:\n  requestSize:\n    agent: monitor\n";
        let err = FieldValueMasks::parse(doc).unwrap_err();
        assert!(matches!(err, ConfigParseError::InvalidFieldAgent { .. }));
    }

    #[test]
    fn test_malformed_document_is_a_parse_error() {
        let err = FieldValueMasks::parse("not: [valid").unwrap_err();
        assert!(matches!(err, ConfigParseError::InvalidFieldMetadata(_)));
    }

    #[test]
    fn test_empty_masks() {
        let masks = FieldValueMasks::parse("fields: {}").unwrap();
        assert!(masks.is_empty());
    }
}
