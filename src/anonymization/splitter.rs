//! Record splitter
//!
//! Splits one dual record into zero, one or two single-agent records:
//! translate the agent's sub-fields, copy the shared top-level fields through
//! the shared table, then force every masked field to null. Emission order is
//! fixed: client first, then producer.

use crate::anonymization::compiler::CompiledRules;
use crate::domain::errors::BatchError;
use crate::domain::record::{Agent, DualRecord, SingleAgentRecord};
use serde_json::Value;
use std::sync::Arc;

/// Splits dual records into translated, masked single-agent records
#[derive(Debug, Clone)]
pub struct RecordSplitter {
    rules: Arc<CompiledRules>,
}

impl RecordSplitter {
    pub fn new(rules: Arc<CompiledRules>) -> Self {
        RecordSplitter { rules }
    }

    /// Split a dual record into per-agent records
    ///
    /// Returns an empty vector when neither agent key is present.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::UntranslatedField`] (or the shared-field variant)
    /// when any field lacks a translation entry; the caller must fail the
    /// whole batch.
    pub fn split(&self, dual: &DualRecord) -> Result<Vec<SingleAgentRecord>, BatchError> {
        let mut records = Vec::with_capacity(2);

        for agent in Agent::ALL {
            if dual.has_agent(agent) {
                records.push(self.extract_agent_record(agent, dual)?);
            }
        }

        Ok(records)
    }

    fn extract_agent_record(
        &self,
        agent: Agent,
        dual: &DualRecord,
    ) -> Result<SingleAgentRecord, BatchError> {
        let translations = self.rules.translations();
        let mut record = SingleAgentRecord::new(agent);

        if let Some(section) = dual.agent_section(agent) {
            for (field, value) in section {
                let translated = translations
                    .translate_agent_field(agent, field)
                    .ok_or_else(|| BatchError::UntranslatedField {
                        agent,
                        field: field.clone(),
                    })?;
                record.insert(translated, value.clone());
            }
        }

        for (field, value) in dual.shared_fields() {
            let translated = translations.translate_shared_field(field).ok_or_else(|| {
                BatchError::UntranslatedSharedField {
                    field: field.clone(),
                }
            })?;
            record.insert(translated, value.clone());
        }

        // Masked fields are forced to null even when the source never carried
        // them: the published schema must show the field as deliberately empty.
        for masked in self.rules.masks().masked_fields(agent) {
            record.insert(masked.clone(), Value::Null);
        }

        Ok(record)
    }
}
