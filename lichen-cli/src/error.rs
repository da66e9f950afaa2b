//! CLI-specific error types and exit code mapping

use lichen_core::error::LichenError;
use lichen_evaluated_model::ModelExportError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The input model file could not be decoded.
    #[error("invalid model '{path}': {reason}")]
    Model { path: String, reason: String },

    /// The exporter rejected the model (identity exhaustion, dangling reference, ...).
    #[error("export error: {0}")]
    Export(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from lichen-core.
    #[error("{0}")]
    Core(#[from] LichenError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                         |
    /// |------|---------------------------------|
    /// | 0    | Success                         |
    /// | 1    | General / command error         |
    /// | 2    | Configuration error             |
    /// | 4    | Input model could not be read   |
    /// | 5    | Export failed                   |
    /// | 10   | IO error                        |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Model { .. } => 4,
            Self::Export(_) => 5,
            Self::Io(_) => 10,
            Self::Core(LichenError::Config(_)) => 2,
            Self::Core(LichenError::Export(_)) => 5,
            Self::Core(LichenError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<ModelExportError> for CliError {
    fn from(e: ModelExportError) -> Self {
        match e {
            ModelExportError::Io(source) => Self::Io(source),
            ModelExportError::Config { .. } => Self::Config(e.to_string()),
            other => Self::Export(other.to_string()),
        }
    }
}
