//! `tailgate-config` — persisted runtime configuration for Tailgate.
//!
//! Provides:
//! - Typed config schema (pruning, upstream, server, logging)
//! - YAML read/write with atomic replace and backup rotation
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Schema validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::{apply_all_defaults, DEFAULT_KEEP_TAIL_COUNT};
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::TailgateConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

/// Load, substitute env vars, apply defaults, and validate a config
/// file. The main entry point for loading config at runtime.
///
/// Validation errors fail the load; warnings are logged and tolerated.
pub async fn load_and_prepare(path: &Path) -> Result<TailgateConfig> {
    let raw_config = load_config(path).await?;

    let value = serde_json::to_value(&raw_config)
        .context("failed to serialize config for env substitution")?;
    let value = resolve_env_vars(&value)?;
    let config: TailgateConfig =
        serde_json::from_value(value).context("failed to rebuild config after substitution")?;

    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        warn!(%warning, "config warning");
    }
    if !report.is_valid() {
        let details: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        anyhow::bail!("invalid config at {}: {}", path.display(), details.join("; "));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prepares_a_missing_file_into_usable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        let config = load_and_prepare(&path).await.unwrap();
        assert_eq!(config.keep_tail_count(), Some(DEFAULT_KEEP_TAIL_COUNT));
        assert!(config.server.unwrap().port.is_some());
    }

    #[tokio::test]
    async fn rejects_an_invalid_upstream() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        tokio::fs::write(&path, "upstream:\n  baseUrl: \"not-a-url\"\n")
            .await
            .unwrap();
        let err = load_and_prepare(&path).await.unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }
}
