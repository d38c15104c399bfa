//! Field translation tables
//!
//! Translation maps original source field names to their published names, per
//! agent and for shared top-level fields. The table doubles as the source
//! projection: only fields with a translation entry are allowed to leave the
//! source, and a field arriving without an entry fails its whole batch.
//!
//! The artifact is a line-oriented file:
//!
//! ```text
//! client.securityServerType -> securityServerType
//! producer.requestInTs -> requestInTs
//! messageId -> messageId
//! ```
//!
//! One-segment sources are shared fields; two-segment sources belong to the
//! named agent. Anything longer is a compile error.

use crate::domain::errors::ConfigParseError;
use crate::domain::record::{Agent, DualRecord};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::str::FromStr;

/// Compiled original-name to published-name mappings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTranslationTable {
    client: BTreeMap<String, String>,
    producer: BTreeMap<String, String>,
    shared: BTreeMap<String, String>,
}

impl FieldTranslationTable {
    /// Parse the line-oriented translation artifact
    ///
    /// Blank lines are skipped. Every other line must split into exactly one
    /// `original -> new` pair.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigParseError`] for a malformed line, a source with more
    /// than two dot-separated segments, or a two-segment source whose first
    /// segment is not `client` or `producer`.
    pub fn parse(text: &str) -> Result<Self, ConfigParseError> {
        let mut table = FieldTranslationTable::default();

        for (idx, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let mut parts = line.split(" -> ");
            let (original, new_name) = match (parts.next(), parts.next(), parts.next()) {
                (Some(original), Some(new_name), None) => (original.trim(), new_name.trim()),
                _ => {
                    return Err(ConfigParseError::MalformedTranslationLine {
                        line_no: idx + 1,
                        line: line.to_string(),
                    })
                }
            };
            if original.is_empty() || new_name.is_empty() {
                return Err(ConfigParseError::MalformedTranslationLine {
                    line_no: idx + 1,
                    line: line.to_string(),
                });
            }

            let segments: Vec<&str> = original.split('.').collect();
            match segments.as_slice() {
                [field] => {
                    table
                        .shared
                        .insert((*field).to_string(), new_name.to_string());
                }
                [agent, field] => match Agent::from_str(agent) {
                    Ok(Agent::Client) => {
                        table
                            .client
                            .insert((*field).to_string(), new_name.to_string());
                    }
                    Ok(Agent::Producer) => {
                        table
                            .producer
                            .insert((*field).to_string(), new_name.to_string());
                    }
                    Err(_) => {
                        return Err(ConfigParseError::UnknownAgent {
                            original: original.to_string(),
                            agent: (*agent).to_string(),
                        })
                    }
                },
                _ => {
                    return Err(ConfigParseError::TooManyPathSegments {
                        original: original.to_string(),
                    })
                }
            }
        }

        Ok(table)
    }

    /// Read and parse the translation artifact from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigParseError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// The published name for an agent's field, if any
    pub fn translate_agent_field(&self, agent: Agent, field: &str) -> Option<&str> {
        let table = match agent {
            Agent::Client => &self.client,
            Agent::Producer => &self.producer,
        };
        table.get(field).map(String::as_str)
    }

    /// The published name for a shared top-level field, if any
    pub fn translate_shared_field(&self, field: &str) -> Option<&str> {
        self.shared.get(field).map(String::as_str)
    }

    /// Whether the table has no entries at all
    pub fn is_empty(&self) -> bool {
        self.client.is_empty() && self.producer.is_empty() && self.shared.is_empty()
    }

    /// Number of entries across all three tables
    pub fn len(&self) -> usize {
        self.client.len() + self.producer.len() + self.shared.len()
    }

    /// The source projection implied by the table's original names
    pub fn allowed_fields(&self) -> AllowedFields {
        AllowedFields {
            client: self.client.keys().cloned().collect(),
            producer: self.producer.keys().cloned().collect(),
            shared: self.shared.keys().cloned().collect(),
        }
    }
}

/// Allowed-field projection applied to records as they leave the source
///
/// Built from the translation table's original names. Fields outside the
/// projection never enter the pipeline, so a source store can carry extra
/// bookkeeping fields without tripping translation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllowedFields {
    client: BTreeSet<String>,
    producer: BTreeSet<String>,
    shared: BTreeSet<String>,
}

impl AllowedFields {
    /// Whether an agent sub-record field is inside the projection
    pub fn allows_agent_field(&self, agent: Agent, field: &str) -> bool {
        match agent {
            Agent::Client => self.client.contains(field),
            Agent::Producer => self.producer.contains(field),
        }
    }

    /// Whether a shared top-level field is inside the projection
    pub fn allows_shared_field(&self, field: &str) -> bool {
        self.shared.contains(field)
    }

    /// Project a dual record down to the allowed fields
    pub fn project(&self, record: &DualRecord) -> DualRecord {
        let mut out = Map::new();

        for agent in Agent::ALL {
            if let Some(section) = record.agent_section(agent) {
                let kept: Map<String, Value> = section
                    .iter()
                    .filter(|(field, _)| self.allows_agent_field(agent, field))
                    .map(|(field, value)| (field.clone(), value.clone()))
                    .collect();
                out.insert(agent.as_str().to_string(), Value::Object(kept));
            }
        }

        for (field, value) in record.shared_fields() {
            if self.allows_shared_field(field) {
                out.insert(field.clone(), value.clone());
            }
        }

        DualRecord::new(out)
    }
}
