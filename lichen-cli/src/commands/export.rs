//! `lichen export` command handler

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use lichen_core::config::LichenConfig;
use lichen_evaluated_model::{ExportConfig, ExportDocument, ModelExporter, OutputFormat};

use crate::cli::{DocumentFormat, ExportArgs};
use crate::commands::read_model;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `export` command.
///
/// The document is rendered completely before anything is written, so a failed
/// export leaves neither stdout nor the `--out` file with partial content.
///
/// # Errors
///
/// Returns `CliError::Config` for invalid traversal order or reference policy,
/// `CliError::Model` when the input cannot be decoded and `CliError::Export`
/// when the exporter rejects the graph.
pub async fn execute(
    args: ExportArgs,
    config: &LichenConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let export_config = merge_args(ExportConfig::from_core(&config.export), &args);
    let options = export_config.to_options()?;

    info!(
        input = %args.input.display(),
        format = %options.format,
        order = %options.traversal_order,
        "exporting evaluated model"
    );

    let mut model = read_model(&args.input).await?;
    if args.refresh_statistics {
        model.refresh_statistics();
    }

    let document = ModelExporter::new(options).render(&model)?;

    let destination = match &args.out {
        Some(path) => {
            write_file(path, &document.content).await?;
            path.display().to_string()
        }
        None => {
            write_stdout(&document.content)?;
            "-".to_owned()
        }
    };

    let report = ExportReport::new(&args.input, destination, &document);
    if args.out.is_some() {
        writer.render(&report)?;
    } else {
        writer.render_stderr(&report)?;
    }

    Ok(())
}

/// Apply command-line overrides on top of the configured export section.
fn merge_args(mut config: ExportConfig, args: &ExportArgs) -> ExportConfig {
    if let Some(format) = args.format {
        config.format = match format {
            DocumentFormat::Json => OutputFormat::Json,
            DocumentFormat::Yaml => OutputFormat::Yaml,
        };
    }
    if !args.order.is_empty() {
        config.traversal_order = args.order.clone();
    }
    config
        .always_reference
        .extend(args.always_reference.iter().cloned());
    if args.tag_references {
        config.tag_references = true;
    }
    if let Some(max) = args.max_identities {
        config.max_identities_per_type = max;
    }
    config
}

/// Write the document next to its destination, then move it into place.
async fn write_file(path: &Path, content: &str) -> Result<(), CliError> {
    let staging = staging_path(path);
    if let Err(e) = tokio::fs::write(&staging, content).await {
        warn!(path = %staging.display(), error = %e, "failed to write staging file");
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

fn write_stdout(content: &str) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        writeln!(handle)?;
    }
    handle.flush()?;
    Ok(())
}

/// Summary of a finished export.
#[derive(Serialize)]
pub struct ExportReport {
    /// Input model path
    pub source: String,
    /// Output file path, or `-` for stdout
    pub destination: String,
    /// Document format
    pub format: OutputFormat,
    /// Size of the document in bytes
    pub bytes: usize,
    /// Number of identified nodes
    pub total_nodes: u64,
    /// Identified nodes per node type
    pub node_counts: BTreeMap<String, u32>,
}

impl ExportReport {
    fn new(input: &Path, destination: String, document: &ExportDocument) -> Self {
        Self {
            source: input.display().to_string(),
            destination,
            format: document.format,
            bytes: document.content.len(),
            total_nodes: document.total_nodes(),
            node_counts: document
                .node_counts
                .iter()
                .map(|(node_type, count)| (node_type.as_str().to_owned(), *count))
                .collect(),
        }
    }
}

impl Render for ExportReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Export: {}", self.source.bold())?;
        writeln!(w, "  Destination: {}", self.destination)?;
        writeln!(w, "  Format: {}", self.format)?;
        writeln!(w, "  Size: {} bytes", self.bytes)?;
        writeln!(
            w,
            "  Nodes: {}",
            self.total_nodes.to_string().green().bold()
        )?;
        for (node_type, count) in &self.node_counts {
            writeln!(w, "    {:<28} {:>8}", node_type, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use lichen_evaluated_model::NodeType;

    use crate::cli::{Cli, Commands};

    fn parse_export(extra: &[&str]) -> ExportArgs {
        let mut argv = vec!["lichen", "export", "model.json"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).expect("should parse").command {
            Commands::Export(args) => args,
            _ => panic!("expected Export command"),
        }
    }

    #[test]
    fn test_merge_args_without_flags_keeps_config() {
        let base = ExportConfig {
            format: OutputFormat::Yaml,
            traversal_order: vec!["packages".to_owned()],
            always_reference: vec!["scan_result.issues".to_owned()],
            max_identities_per_type: 10,
            tag_references: true,
        };
        let merged = merge_args(base.clone(), &parse_export(&[]));
        assert_eq!(merged, base);
    }

    #[test]
    fn test_merge_args_flags_override_config() {
        let base = ExportConfig {
            traversal_order: vec!["packages".to_owned()],
            always_reference: vec!["scan_result.issues".to_owned()],
            ..ExportConfig::default()
        };
        let args = parse_export(&[
            "--format",
            "yaml",
            "--order",
            "issues",
            "--always-reference",
            "package.scan_results",
            "--tag-references",
            "--max-identities",
            "5",
        ]);
        let merged = merge_args(base, &args);
        assert_eq!(merged.format, OutputFormat::Yaml);
        assert_eq!(merged.traversal_order, vec!["issues"]);
        assert_eq!(
            merged.always_reference,
            vec!["scan_result.issues", "package.scan_results"]
        );
        assert!(merged.tag_references);
        assert_eq!(merged.max_identities_per_type, 5);
    }

    #[test]
    fn test_staging_path_is_sibling() {
        let staging = staging_path(Path::new("/tmp/out/model.yml"));
        assert_eq!(staging, PathBuf::from("/tmp/out/model.yml.partial"));
    }

    #[test]
    fn test_export_report_render_text() {
        let document = ExportDocument {
            format: OutputFormat::Json,
            content: "{}".to_owned(),
            node_counts: BTreeMap::from([(NodeType::Package, 3), (NodeType::Issue, 2)]),
        };
        let report = ExportReport::new(Path::new("model.json"), "-".to_owned(), &document);

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("model.json"), "should show source");
        assert!(output.contains("5"), "should show total node count");
        assert!(output.contains(NodeType::Package.as_str()));
    }

    #[test]
    fn test_export_report_json_serialization() {
        let document = ExportDocument {
            format: OutputFormat::Yaml,
            content: "a: 1\n".to_owned(),
            node_counts: BTreeMap::from([(NodeType::Package, 1)]),
        };
        let report = ExportReport::new(Path::new("m.json"), "out.yml".to_owned(), &document);

        let parsed = serde_json::to_value(&report).expect("JSON serialization should succeed");
        assert_eq!(parsed["format"], "yaml");
        assert_eq!(parsed["bytes"], 5);
        assert_eq!(parsed["total_nodes"], 1);
        assert_eq!(parsed["node_counts"][NodeType::Package.as_str()], 1);
    }
}
