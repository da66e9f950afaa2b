//! `lichen config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use lichen_core::config::LichenConfig;
use lichen_evaluated_model::ExportConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Load the file and run both validation layers.
///
/// `LichenConfig::load` checks value ranges; `ExportConfig::validate` checks
/// container names and `schema.field` entries against the model schema.
async fn load_and_validate(config_path: &Path) -> Result<LichenConfig, CliError> {
    let config = LichenConfig::load(config_path).await?;
    ExportConfig::from_core(&config.export).validate()?;
    Ok(config)
}

/// Execute the config validate subcommand.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (parse errors, invalid values,
/// unknown containers or reference fields).
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = match load_and_validate(config_path).await {
        Ok(_) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the config show subcommand.
///
/// Displays the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Config` if loading fails or `CliError::Command` if the
/// section name is unknown.
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = load_and_validate(config_path).await?;
    let report = build_report(&config, config_path, section)?;
    writer.render(&report)?;

    Ok(())
}

fn build_report(
    config: &LichenConfig,
    config_path: &Path,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    let source = config_path.display().to_string();
    let report = match section.as_deref() {
        Some("general") => ConfigReport {
            source,
            section: section.clone(),
            config_toml: toml::to_string_pretty(&config.general)
                .unwrap_or_else(|e| format!("(serialization error: {})", e)),
        },
        Some("export") => ConfigReport {
            source,
            section: section.clone(),
            config_toml: toml::to_string_pretty(&config.export)
                .unwrap_or_else(|e| format!("(serialization error: {})", e)),
        },
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected: general, export)",
                other
            )));
        }
        None => ConfigReport {
            source,
            section: None,
            config_toml: toml::to_string_pretty(config)
                .unwrap_or_else(|e| format!("(serialization error: {})", e)),
        },
    };
    Ok(report)
}

/// Configuration display report.
///
/// The `config_toml` field is skipped during JSON serialization (only used for text rendering).
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
