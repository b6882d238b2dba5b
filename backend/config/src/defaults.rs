//! Config defaults: fills unset values after parsing.

use crate::schema::{LoggingConfig, PruningConfig, ServerConfig, TailgateConfig};

/// Default number of recent turn nodes kept by the pruner.
pub const DEFAULT_KEEP_TAIL_COUNT: i64 = 50;

/// Default relay listen port.
pub const DEFAULT_PORT: u16 = 7878;

/// Default bind interface.
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Default log level filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: TailgateConfig) -> TailgateConfig {
    let config = apply_pruning_defaults(config);
    let config = apply_server_defaults(config);
    apply_logging_defaults(config)
}

fn apply_pruning_defaults(mut config: TailgateConfig) -> TailgateConfig {
    let pruning = config.pruning.get_or_insert_with(PruningConfig::default);
    if pruning.keep_tail_count.is_none() {
        pruning.keep_tail_count = Some(DEFAULT_KEEP_TAIL_COUNT);
    }
    config
}

fn apply_server_defaults(mut config: TailgateConfig) -> TailgateConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    if server.bind.is_none() {
        server.bind = Some(DEFAULT_BIND.to_string());
    }
    if server.port.is_none() {
        server.port = Some(DEFAULT_PORT);
    }
    config
}

fn apply_logging_defaults(mut config: TailgateConfig) -> TailgateConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_keep_tail_count() {
        let config = apply_all_defaults(TailgateConfig::default());
        assert_eq!(config.keep_tail_count(), Some(DEFAULT_KEEP_TAIL_COUNT));
    }

    #[test]
    fn applies_server_defaults() {
        let config = apply_all_defaults(TailgateConfig::default());
        let server = config.server.unwrap();
        assert_eq!(server.bind.as_deref(), Some(DEFAULT_BIND));
        assert_eq!(server.port, Some(DEFAULT_PORT));
    }

    #[test]
    fn does_not_override_user_set_bound() {
        let mut config = TailgateConfig::default();
        config.pruning = Some(PruningConfig {
            keep_tail_count: Some(5),
        });
        let config = apply_all_defaults(config);
        assert_eq!(config.keep_tail_count(), Some(5));
    }
}
