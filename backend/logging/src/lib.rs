//! Structured logging for Tailgate.
//!
//! Console + rolling NDJSON file output via `tracing`, plus a
//! dedicated per-request relay event log.

pub mod event_logger;
pub mod logger;

pub use event_logger::{EventLogger, RelayEvent, RelayLogEntry};
pub use logger::init_logger;
