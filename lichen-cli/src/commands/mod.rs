//! Command handlers -- one module per subcommand

pub mod config;
pub mod export;
pub mod inspect;

use std::path::Path;

use tracing::debug;

use lichen_core::config::LichenConfig;
use lichen_evaluated_model::EvaluatedModel;

use crate::error::CliError;

/// Load the effective configuration for commands that can run without a file.
///
/// A missing file falls back to defaults plus `LICHEN_*` environment overrides.
/// A file that exists but fails to parse or validate is an error.
pub async fn load_effective_config(config_path: &Path) -> Result<LichenConfig, CliError> {
    if tokio::fs::try_exists(config_path).await.unwrap_or(false) {
        return Ok(LichenConfig::load(config_path).await?);
    }

    debug!(path = %config_path.display(), "config file not found, using defaults");
    let mut config = LichenConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Read an arena-form evaluated model from a JSON file.
pub async fn read_model(path: &Path) -> Result<EvaluatedModel, CliError> {
    let raw = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&raw).map_err(|e| CliError::Model {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_effective_config_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let config = load_effective_config(&temp_dir.path().join("absent.toml"))
            .await
            .expect("missing file should fall back to defaults");
        assert_eq!(config.general.log_level, "info");
    }

    #[tokio::test]
    async fn test_load_effective_config_rejects_invalid_file() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = temp_dir.path().join("lichen.toml");
        std::fs::write(&path, "[export]\nformat = \"xml\"\n").expect("should write config");

        let err = load_effective_config(&path)
            .await
            .expect_err("invalid format should fail");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_read_model_reports_path_on_decode_error() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = temp_dir.path().join("model.json");
        std::fs::write(&path, "{\"packages\": 3}").expect("should write model");

        let err = read_model(&path).await.expect_err("bad model should fail");
        match err {
            CliError::Model { path: p, .. } => assert!(p.ends_with("model.json")),
            other => panic!("expected Model error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_model_empty_object_is_empty_model() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = temp_dir.path().join("model.json");
        std::fs::write(&path, "{}").expect("should write model");

        let model = read_model(&path).await.expect("empty object should decode");
        assert_eq!(model.node_count(), 0);
    }
}
