//! Global `tracing` initialization.
//!
//! Console output always; when a log directory is configured, a
//! daily-rolling NDJSON file is written alongside it.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global logger.
///
/// `RUST_LOG` wins over the configured `level`. With `log_dir` unset
/// only the console layer is installed (the one-shot CLI path).
pub fn init_logger(log_dir: Option<&Path>, level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    match log_dir {
        Some(dir) => {
            // Rolling NDJSON file: `<dir>/tailgate.log.YYYY-MM-DD`
            let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "tailgate.log");
            let file_layer = fmt::layer()
                .json()
                .with_writer(file_appender)
                .with_ansi(false);
            let _ = registry.with(file_layer).try_init();
        }
        None => {
            let _ = registry.try_init();
        }
    }
}
