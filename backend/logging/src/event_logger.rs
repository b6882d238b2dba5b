//! Relay event log.
//!
//! One structured record per relayed request, emitted through the
//! tracing pipeline so it lands in the rolling NDJSON file.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// What happened to one relayed request.
#[derive(Debug, Clone, Serialize)]
pub struct RelayEvent {
    pub method: String,
    pub path: String,
    pub upstream_status: u16,
    /// Whether the response body was rewritten by the pruner.
    pub rewritten: bool,
    /// Nodes dropped from the conversation mapping, when rewritten.
    pub nodes_removed: usize,
    pub elapsed_ms: u128,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelayLogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: RelayEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Log one relayed request to the `relay_events` target.
    pub fn log_relay(request_id: &str, event: RelayEvent) {
        let entry = RelayLogEntry {
            request_id: request_id.into(),
            timestamp: Utc::now(),
            event,
        };

        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: "relay_events", event = %json, "relay event"),
            Err(_) => info!(target: "relay_events", event = ?entry, "relay event"),
        }
    }
}
