//! Output formatting utilities for the CLI
//!
//! Query results are rendered by `promql_core`; this module only covers the
//! CLI's own messages and the configuration listing.

use anyhow::Result;
use colored::*;
use promql_core::OutputFormat;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

use crate::config::CliConfig;

const MASK: &str = "********";

/// Format the effective configuration, as JSON when the output format is
/// `json` and as a table otherwise
pub fn format_config(config: &CliConfig, path: &Path) -> Result<String> {
    if config.output_format() == OutputFormat::Json {
        let mut masked = config.clone();
        if !masked.auth.credentials.is_empty() {
            masked.auth.credentials = MASK.to_string();
        }
        return Ok(serde_json::to_string_pretty(&masked)?);
    }

    #[derive(Tabled)]
    struct SettingRow {
        #[tabled(rename = "Setting")]
        key: &'static str,
        #[tabled(rename = "Value")]
        value: String,
    }

    let display_path = |p: &Option<std::path::PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    };

    let rows = vec![
        SettingRow {
            key: "host",
            value: config.host.cyan().to_string(),
        },
        SettingRow {
            key: "output",
            value: config.output_format().name().to_string(),
        },
        SettingRow {
            key: "step",
            value: config.step.clone(),
        },
        SettingRow {
            key: "timeout",
            value: format!("{}s", config.timeout),
        },
        SettingRow {
            key: "no_headers",
            value: config.no_headers.to_string(),
        },
        SettingRow {
            key: "verbose",
            value: config.verbose.to_string(),
        },
        SettingRow {
            key: "auth.type",
            value: config.auth.auth_type.clone(),
        },
        SettingRow {
            key: "auth.credentials",
            value: if config.auth.credentials.is_empty() {
                String::new()
            } else {
                MASK.dimmed().to_string()
            },
        },
        SettingRow {
            key: "auth.credentials_file",
            value: display_path(&config.auth.credentials_file),
        },
        SettingRow {
            key: "tls.ca_cert_file",
            value: display_path(&config.tls.ca_cert_file),
        },
        SettingRow {
            key: "tls.cert_file",
            value: display_path(&config.tls.cert_file),
        },
        SettingRow {
            key: "tls.key_file",
            value: display_path(&config.tls.key_file),
        },
        SettingRow {
            key: "tls.insecure_skip_verify",
            value: if config.tls.insecure_skip_verify {
                "true".yellow().to_string()
            } else {
                "false".to_string()
            },
        },
    ];

    let table = Table::new(rows).with(Style::rounded()).to_string();
    Ok(format!(
        "{} ({})\n{}",
        "CLI Configuration".bold(),
        path.display(),
        table
    ))
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_success() {
        let message = format_success("Operation completed");
        assert!(message.contains("✓"));
        assert!(message.contains("Operation completed"));
    }

    #[test]
    fn test_format_config_table() {
        let config = CliConfig {
            step: "30s".to_string(),
            ..CliConfig::default()
        };

        let out = format_config(&config, Path::new("/tmp/promql.toml")).unwrap();
        assert!(out.contains("/tmp/promql.toml"));
        assert!(out.contains("Setting"));
        assert!(out.contains("http://localhost:9090"));
        assert!(out.contains("30s"));
        assert!(out.contains("10s"));
        assert!(out.contains("tls.insecure_skip_verify"));
    }

    #[test]
    fn test_format_config_masks_credentials() {
        let mut config = CliConfig::default();
        config.auth.auth_type = "Bearer".to_string();
        config.auth.credentials = "hunter2".to_string();
        config.auth.credentials_file = Some(PathBuf::from("/etc/token"));

        let out = format_config(&config, Path::new("config.toml")).unwrap();
        assert!(!out.contains("hunter2"));
        assert!(out.contains(MASK));
        assert!(out.contains("/etc/token"));

        config.output = "json".to_string();
        let out = format_config(&config, Path::new("config.toml")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["auth"]["credentials"], MASK);
        assert_eq!(value["auth"]["type"], "Bearer");
        assert_eq!(value["host"], "http://localhost:9090");
    }
}
