//! Validate config command implementation
//!
//! Loads the configuration file and compiles the rule artifacts without
//! touching the source, sink, or checkpoint, so a deployment can be checked
//! before the scheduler starts invoking runs.

use crate::anonymization::RuleCompiler;
use crate::cli::exit_codes;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(exit_codes::CONFIG_ERROR);
            }
        };

        let rules = match RuleCompiler::compile_files(&config.anonymizer) {
            Ok(rules) => {
                println!("Rule artifacts compiled successfully");
                rules
            }
            Err(e) => {
                println!("Failed to compile rule artifacts");
                println!("   Error: {e}");
                return Ok(exit_codes::CONFIG_ERROR);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level:          {}", config.application.log_level);
        println!("  Record Feed:        {}", config.source.path);
        println!("  Timestamp Field:    {}", config.source.timestamp_field);
        println!("  Batch Size:         {}", config.anonymizer.batch_size);
        println!("  Translations:       {}", rules.translations().len());
        println!("  Hiding Rules:       {}", rules.hiding_rules().len());
        println!("  Substitution Rules: {}", rules.substitution_rules().len());
        println!("  Transformers:       {:?}", rules.transformers().names());
        println!();

        Ok(exit_codes::SUCCESS)
    }
}
