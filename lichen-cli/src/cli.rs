//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Lichen -- evaluated license/dependency model exporter.
///
/// Use `lichen <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "lichen", version, about, long_about = None)]
pub struct Cli {
    /// Path to the lichen.toml configuration file.
    #[arg(short, long, default_value = "lichen.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Report format for command summaries.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported report formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Document formats accepted by `export --format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentFormat {
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export an evaluated model as an index-aligned document.
    Export(ExportArgs),

    /// Summarize an evaluated model and check that it exports cleanly.
    Inspect(InspectArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- export ----

/// Export an arena-form evaluated model (JSON) to JSON or YAML.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to the arena-form model JSON.
    pub input: PathBuf,

    /// Document format (overrides `[export] format`).
    #[arg(short, long)]
    pub format: Option<DocumentFormat>,

    /// Write the document to this file instead of stdout.
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,

    /// Containers to visit first, comma separated (overrides `[export] traversal_order`).
    #[arg(long, value_delimiter = ',')]
    pub order: Vec<String>,

    /// Extra always-reference fields as `schema.field`, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub always_reference: Vec<String>,

    /// Add a `type` tag to every reference document.
    #[arg(long)]
    pub tag_references: bool,

    /// Recompute the statistics block before exporting.
    #[arg(long)]
    pub refresh_statistics: bool,

    /// Maximum identities per node type.
    #[arg(long)]
    pub max_identities: Option<u32>,
}

// ---- inspect ----

/// Print node counts per type and verify the model exports.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the arena-form model JSON.
    pub input: PathBuf,
}

// ---- config ----

/// Manage lichen configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, export).
        #[arg(long)]
        section: Option<String>,
    },
}
