//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::ConnectorBlueprint;

use crate::cli::ValidateArgs;
use crate::error::CliError;

/// Interval below which ticks are likely to overlap on a slow receiver
const SHORT_INTERVAL_MS: u64 = 1_000;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    sensor_id: String,
    connector_id: String,
    receiver: String,
    interval_ms: u64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    match result.error {
        None => Ok(()),
        Some(error) => Err(CliError::config_validation(error).into()),
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    sensor_id: blueprint.sensor_id.clone(),
                    connector_id: blueprint.credentials.connector_id.clone(),
                    receiver: blueprint.receiver.base_url(),
                    interval_ms: blueprint.interval,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &ConnectorBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();
    let receiver = &blueprint.receiver;

    if receiver.trust_all && !receiver.use_ssl {
        warnings.push("receiver.trustAll has no effect without receiver.useSsl".to_string());
    }
    if receiver.trust_all && receiver.use_ssl {
        warnings.push(
            "receiver.trustAll disables certificate validation - use for testing only".to_string(),
        );
    }

    if blueprint.interval < SHORT_INTERVAL_MS {
        warnings.push(format!(
            "interval is {} ms - ticks may overlap when the receiver is slow",
            blueprint.interval
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Sensor: {}", summary.sensor_id);
            println!("  Connector: {}", summary.connector_id);
            println!("  Receiver: {}", summary.receiver);
            println!("  Interval: {} ms", summary.interval_ms);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
