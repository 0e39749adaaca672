//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{NotifierBlueprint, SubscriberKind};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

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
    version: String,
    subscriber_count: usize,
    online_count: usize,
    event_count: usize,
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

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

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
                    version: format!("{:?}", blueprint.version),
                    subscriber_count: blueprint.subscribers.len(),
                    online_count: blueprint.subscribers.iter().filter(|s| s.online).count(),
                    event_count: blueprint.events.len(),
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
fn collect_warnings(blueprint: &NotifierBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.subscribers.is_empty() {
        warnings.push("No subscribers configured - broadcasts reach nobody".to_string());
    }

    if blueprint.events.is_empty() {
        warnings.push("No events configured - only ad-hoc `event <text>` is available".to_string());
    }

    for subscriber in &blueprint.subscribers {
        if subscriber.kind == SubscriberKind::Admin
            && !subscriber.online
            && subscriber.pending_capacity.is_none()
        {
            warnings.push(format!(
                "Admin '{}' starts offline with an unbounded pending queue",
                subscriber.id
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!(
                "  Subscribers: {} ({} online)",
                summary.subscriber_count, summary.online_count
            );
            println!("  Events: {}", summary.event_count);
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn validate_file(contents: &str) -> ValidationResult {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifier.toml");
        std::fs::write(&path, contents).unwrap();
        validate_config(&ValidateArgs {
            config: path,
            json: false,
        })
    }

    #[test]
    fn test_demo_warns_about_offline_admin() {
        let warnings = collect_warnings(&NotifierBlueprint::demo());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("mudassir"));
    }

    #[test]
    fn test_valid_file_summary() {
        let result = validate_file(
            r#"
[[subscribers]]
id = "hamid"
online = true

[[subscribers]]
id = "mudassir"
pending_capacity = 10

[[events]]
name = "report"
description = "Monthly report is ready"
"#,
        );

        assert!(result.valid);
        assert!(result.warnings.is_none());
        let summary = result.summary.unwrap();
        assert_eq!(summary.subscriber_count, 2);
        assert_eq!(summary.online_count, 1);
        assert_eq!(summary.event_count, 1);
    }

    #[test]
    fn test_duplicate_ids_invalid() {
        let result = validate_file(
            r#"
[[subscribers]]
id = "a"

[[subscribers]]
id = "a"
"#,
        );
        assert!(!result.valid);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_missing_file() {
        let result = validate_config(&ValidateArgs {
            config: PathBuf::from("/nonexistent/notifier.toml"),
            json: true,
        });
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("File not found"));
    }
}
