//! Rule compiler
//!
//! Compiles the raw configuration artifacts — translation list, rule document,
//! field metadata and enabled transformer names — into one immutable
//! [`CompiledRules`] value that the splitter, rule engine and transformer
//! chain share. Compilation is side-effect-free; any failure is a
//! [`ConfigParseError`] and fatal to process startup.
//!
//! The rule document is YAML:
//!
//! ```yaml
//! hiding-rules:
//!   - - feature: clientMemberCode
//!       regex: "^10012345$"
//! substitution-rules:
//!   - conditions:
//!       - feature: serviceCode
//!         regex: "^sensitiveService$"
//!     substitutes:
//!       - feature: clientMemberCode
//!         value: "#N/A"
//! ```

use crate::anonymization::masks::FieldValueMasks;
use crate::anonymization::rules::{Condition, HidingRule, SubstitutionRule, Substitute};
use crate::anonymization::transformers::TransformerChain;
use crate::anonymization::translation::{AllowedFields, FieldTranslationTable};
use crate::config::schema::AnonymizerConfig;
use crate::domain::errors::ConfigParseError;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawRuleDocument {
    #[serde(default)]
    hiding_rules: Vec<Vec<RawCondition>>,
    #[serde(default)]
    substitution_rules: Vec<RawSubstitutionRule>,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    feature: String,
    regex: String,
}

#[derive(Debug, Deserialize)]
struct RawSubstitutionRule {
    conditions: Vec<RawCondition>,
    substitutes: Vec<RawSubstitute>,
}

#[derive(Debug, Deserialize)]
struct RawSubstitute {
    feature: String,
    value: serde_yaml::Value,
}

/// The complete compiled privacy configuration
///
/// Constructed once by [`RuleCompiler`] and passed explicitly into the
/// pipeline components; no ambient or global state.
#[derive(Debug)]
pub struct CompiledRules {
    translations: FieldTranslationTable,
    masks: FieldValueMasks,
    hiding: Vec<HidingRule>,
    substitution: Vec<SubstitutionRule>,
    transformers: TransformerChain,
}

impl CompiledRules {
    /// The field translation tables
    pub fn translations(&self) -> &FieldTranslationTable {
        &self.translations
    }

    /// The per-agent field value masks
    pub fn masks(&self) -> &FieldValueMasks {
        &self.masks
    }

    /// Hiding rules in declaration order
    pub fn hiding_rules(&self) -> &[HidingRule] {
        &self.hiding
    }

    /// Substitution rules in declaration order
    pub fn substitution_rules(&self) -> &[SubstitutionRule] {
        &self.substitution
    }

    /// The ordered transformer chain
    pub fn transformers(&self) -> &TransformerChain {
        &self.transformers
    }

    /// The source projection implied by the translation table
    pub fn allowed_fields(&self) -> AllowedFields {
        self.translations.allowed_fields()
    }
}

/// Compiles raw configuration artifacts into [`CompiledRules`]
pub struct RuleCompiler;

impl RuleCompiler {
    /// Compile from the artifact files referenced by the anonymizer config
    ///
    /// # Errors
    ///
    /// Returns [`ConfigParseError`] if any artifact cannot be read or parsed;
    /// callers must treat this as fatal to startup.
    pub fn compile_files(config: &AnonymizerConfig) -> Result<CompiledRules, ConfigParseError> {
        let translations = FieldTranslationTable::from_file(&config.field_translations_file)?;
        let masks = FieldValueMasks::from_file(&config.field_data_file)?;
        let rules_text = read_artifact(&config.rules_file)?;
        Self::compile_parts(translations, masks, &rules_text, &config.transformers)
    }

    /// Compile from already-loaded artifacts
    pub fn compile_parts<S: AsRef<str>>(
        translations: FieldTranslationTable,
        masks: FieldValueMasks,
        rules_yaml: &str,
        transformer_names: &[S],
    ) -> Result<CompiledRules, ConfigParseError> {
        let raw: RawRuleDocument = serde_yaml::from_str(rules_yaml)
            .map_err(|e| ConfigParseError::InvalidRuleDocument(e.to_string()))?;

        let hiding = raw
            .hiding_rules
            .into_iter()
            .map(|conditions| Ok(HidingRule::new(compile_conditions(conditions)?)))
            .collect::<Result<Vec<_>, ConfigParseError>>()?;

        let substitution = raw
            .substitution_rules
            .into_iter()
            .map(|rule| {
                let conditions = compile_conditions(rule.conditions)?;
                let substitutes = rule
                    .substitutes
                    .into_iter()
                    .map(|substitute| {
                        let value = serde_json::to_value(&substitute.value).map_err(|e| {
                            ConfigParseError::InvalidRuleDocument(format!(
                                "substitute value for '{}' is not representable: {e}",
                                substitute.feature
                            ))
                        })?;
                        Ok(Substitute {
                            field: substitute.feature,
                            value,
                        })
                    })
                    .collect::<Result<Vec<_>, ConfigParseError>>()?;
                Ok(SubstitutionRule::new(conditions, substitutes))
            })
            .collect::<Result<Vec<_>, ConfigParseError>>()?;

        let transformers = TransformerChain::from_names(transformer_names)?;

        Ok(CompiledRules {
            translations,
            masks,
            hiding,
            substitution,
            transformers,
        })
    }
}

fn compile_conditions(raw: Vec<RawCondition>) -> Result<Vec<Condition>, ConfigParseError> {
    raw.into_iter()
        .map(|condition| Condition::new(condition.feature, &condition.regex))
        .collect()
}

fn read_artifact(path: impl AsRef<Path>) -> Result<String, ConfigParseError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| ConfigParseError::Io {
        path: path.to_path_buf(),
        source,
    })
}
