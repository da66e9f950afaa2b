//! Lichen CLI -- export evaluated license/dependency models.
//!
//! # Subcommands
//!
//! - `export`: arena-form model JSON to an index-aligned JSON/YAML document
//! - `inspect`: container sizes, statistics and a dry export check
//! - `config`: validate or show the effective configuration

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use cli::{Cli, Commands};
use error::CliError;
use output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is configured from the file when it loads; a broken file is reported
    // by the command itself, so logging falls back to defaults here.
    let mut general = commands::load_effective_config(&cli.config)
        .await
        .map(|config| config.general)
        .unwrap_or_default();
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    if let Err(e) = logging::init_tracing(&general) {
        eprintln!("error: {e}");
        return ExitCode::from(2);
    }
    lichen_core::metrics::describe_all();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Export(args) => {
            let config = commands::load_effective_config(&cli.config).await?;
            commands::export::execute(args, &config, &writer).await
        }
        Commands::Inspect(args) => {
            let config = commands::load_effective_config(&cli.config).await?;
            commands::inspect::execute(args, &config, &writer).await
        }
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}
