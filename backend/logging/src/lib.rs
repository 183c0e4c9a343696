//! Structured logging for selpick.
//!
//! Console plus rolling NDJSON file output, and the selector event log fed by
//! the background relay.

pub mod event_logger;
pub mod logger;

pub use event_logger::{EventLogEntry, EventLogger, SelectorEvent};
pub use logger::init_logger;
