//! `lichen inspect` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use lichen_core::config::LichenConfig;
use lichen_evaluated_model::{
    ContainerKind, EvaluatedModel, ExportConfig, ModelExporter, Statistics,
};

use crate::cli::InspectArgs;
use crate::commands::read_model;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `inspect` command.
///
/// Prints container sizes and freshly computed statistics, then runs a dry
/// export with the configured options to surface dangling references or
/// identity exhaustion before a real export.
pub async fn execute(
    args: InspectArgs,
    config: &LichenConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(input = %args.input.display(), "inspecting evaluated model");

    let options = ExportConfig::from_core(&config.export).to_options()?;
    let model = read_model(&args.input).await?;
    let check = ModelExporter::new(options).export(&model).map(|_| ());

    let report = InspectReport::new(args.input.display().to_string(), &model, check.as_ref().err());
    writer.render(&report)?;

    check.map_err(CliError::from)
}

/// One container line of the inspect report.
#[derive(Serialize)]
pub struct ContainerCount {
    pub container: &'static str,
    pub count: usize,
}

/// Model inspection report.
#[derive(Serialize)]
pub struct InspectReport {
    /// Input model path
    pub source: String,
    /// Entries per container, in document order
    pub containers: Vec<ContainerCount>,
    /// Identity-bearing nodes across all containers
    pub total_nodes: usize,
    /// Statistics recomputed from the graph
    pub statistics: Statistics,
    /// Whether the stored statistics block matches the recomputed one
    pub statistics_current: bool,
    /// Whether a dry export succeeded
    pub exportable: bool,
    /// Export failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InspectReport {
    fn new(
        source: String,
        model: &EvaluatedModel,
        error: Option<&lichen_evaluated_model::ModelExportError>,
    ) -> Self {
        let containers = ContainerKind::ALL
            .iter()
            .map(|kind| ContainerCount {
                container: kind.field_name(),
                count: kind
                    .node_type()
                    .map(|node_type| model.len_of(node_type))
                    .unwrap_or(model.dependency_trees.len()),
            })
            .collect();
        let statistics = Statistics::compute(model);
        Self {
            source,
            containers,
            total_nodes: model.node_count(),
            statistics_current: statistics == model.statistics,
            statistics,
            exportable: error.is_none(),
            error: error.map(ToString::to_string),
        }
    }
}

impl Render for InspectReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Model: {}", self.source.bold())?;
        writeln!(w)?;
        for entry in &self.containers {
            writeln!(w, "  {:<28} {:>8}", entry.container, entry.count)?;
        }
        writeln!(w, "  {:<28} {:>8}", "total nodes".bold(), self.total_nodes)?;
        writeln!(w)?;

        let stats = &self.statistics;
        writeln!(
            w,
            "Open issues: {} (errors {}, warnings {}, hints {})",
            stats.open_issues.total(),
            stats.open_issues.errors,
            stats.open_issues.warnings,
            stats.open_issues.hints
        )?;
        writeln!(
            w,
            "Open rule violations: {} (errors {}, warnings {}, hints {})",
            stats.open_rule_violations.total(),
            stats.open_rule_violations.errors,
            stats.open_rule_violations.warnings,
            stats.open_rule_violations.hints
        )?;
        writeln!(
            w,
            "Projects: {} ({} excluded), packages: {} ({} excluded)",
            stats.total_projects,
            stats.excluded_projects,
            stats.total_packages,
            stats.excluded_packages
        )?;
        writeln!(w, "Dependency tree depth: {}", stats.dependency_tree_depth)?;
        if !self.statistics_current {
            writeln!(
                w,
                "{}",
                "Stored statistics are stale (use `export --refresh-statistics`)".yellow()
            )?;
        }
        writeln!(w)?;

        if self.exportable {
            writeln!(w, "Export check: {}", "OK".green().bold())?;
        } else {
            writeln!(w, "Export check: {}", "FAILED".red().bold())?;
            if let Some(ref err) = self.error {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }
        Ok(())
    }
}
