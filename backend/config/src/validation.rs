//! Config validation with field paths in the messages.

use thiserror::Error;

use crate::schema::TailgateConfig;

/// A validation finding with the offending field path.
#[derive(Debug, Error)]
#[error("config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one validation pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate the config and return every finding.
pub fn validate(config: &TailgateConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if let Some(pruning) = &config.pruning {
        if let Some(count) = pruning.keep_tail_count {
            if count < 1 {
                report.warn(
                    "pruning.keepTailCount",
                    format!("{count} disables pruning; the relay will pass conversations through"),
                );
            }
        }
    }

    if let Some(upstream) = &config.upstream {
        match upstream.base_url.as_deref() {
            Some("") => report.error("upstream.baseUrl", "must not be empty"),
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                report.error("upstream.baseUrl", "must start with http:// or https://")
            }
            _ => {}
        }
    }

    if let Some(server) = &config.server {
        if server.port == Some(0) {
            report.error("server.port", "must be between 1 and 65535");
        }
    }

    if let Some(logging) = &config.logging {
        if let Some(level) = logging.level.as_deref() {
            if !LOG_LEVELS.contains(&level) {
                report.warn(
                    "logging.level",
                    format!("'{level}' is not a known level; expected one of {LOG_LEVELS:?}"),
                );
            }
        }
    }

    report
}
