//! Tracing setup for the `lichen` binary.
//!
//! Events are written to stderr in the format selected by `[general] log_format`,
//! keeping stdout free for exported documents and JSON reports.

use anyhow::{Result, anyhow};
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use lichen_core::config::GeneralConfig;

/// Install the global subscriber. Call once, before the first event.
///
/// `RUST_LOG` wins over `config.log_level` when set.
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer(&config.log_format)?)
        .try_init()
        .map_err(|e| anyhow!("tracing subscriber already installed: {e}"))
}

/// Formatting layer for `log_format` (`json` or `pretty`).
fn stderr_layer<S>(log_format: &str) -> Result<Box<dyn Layer<S> + Send + Sync>>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    match log_format {
        "json" => Ok(layer.json().boxed()),
        "pretty" => Ok(layer.pretty().boxed()),
        other => Err(anyhow!(
            "unknown log format '{other}', expected 'json' or 'pretty'"
        )),
    }
}
