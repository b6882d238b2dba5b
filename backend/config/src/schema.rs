//! Tailgate runtime configuration schema.
//!
//! Typed for serde YAML deserialization. Every section is optional so
//! a missing or sparse file still loads; defaults are applied after
//! parsing by [`crate::defaults::apply_all_defaults`].

use serde::{Deserialize, Serialize};

/// Root configuration for Tailgate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailgateConfig {
    /// Pruning behavior (retention bound).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pruning: Option<PruningConfig>,

    /// Upstream backend the relay forwards to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<UpstreamConfig>,

    /// Local relay server settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Logging configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

/// Retention settings for the conversation pruner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PruningConfig {
    /// How many recent turn nodes survive pruning. Non-positive values
    /// disable pruning entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_tail_count: Option<i64>,
}

/// Upstream backend settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamConfig {
    /// Base URL requests are relayed to (e.g. `https://chatgpt.com`).
    /// Supports `${ENV_VAR}` substitution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Local HTTP server settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Interface to bind, defaults to loopback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    /// Port to listen on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Default level filter when `RUST_LOG` is not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for the rolling NDJSON log; console-only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl TailgateConfig {
    /// Effective retention bound, if any section carries one.
    pub fn keep_tail_count(&self) -> Option<i64> {
        self.pruning.as_ref().and_then(|p| p.keep_tail_count)
    }
}
