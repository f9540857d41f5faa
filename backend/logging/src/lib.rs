//! Structured logging for notionforge.
//!
//! Handles secret redaction, console and rolling JSON file output, and the
//! per-request transfer event trail.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, TransferEvent};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
