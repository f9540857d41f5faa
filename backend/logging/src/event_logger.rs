//! Transfer Event Logger
//!
//! One structured record per markdown transfer, written through `tracing` on
//! the `transfer_events` target so it lands in the NDJSON file.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferEvent {
    Created {
        title: String,
        blocks: usize,
        batches: usize,
    },
    Failed {
        message: String,
    },
    Rejected {
        reason: String,
    },
}

impl TransferEvent {
    /// Copy of the event with free-form strings scrubbed of secrets.
    fn redacted(self) -> Self {
        match self {
            TransferEvent::Failed { message } => TransferEvent::Failed {
                message: redact_sensitive_data(&message),
            },
            TransferEvent::Rejected { reason } => TransferEvent::Rejected {
                reason: redact_sensitive_data(&reason),
            },
            created @ TransferEvent::Created { .. } => created,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub client_ip: String,
    pub timestamp: DateTime<Utc>,
    pub event: TransferEvent,
}

impl EventLogEntry {
    pub fn new(client_ip: &str, event: TransferEvent) -> Self {
        Self {
            client_ip: client_ip.to_string(),
            timestamp: Utc::now(),
            event: event.redacted(),
        }
    }
}

pub struct EventLogger;

impl EventLogger {
    /// Logs a transfer outcome, redacting message text first.
    pub fn log_event(client_ip: &str, event: TransferEvent) {
        let entry = EventLogEntry::new(client_ip, event);
        let payload = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "transfer_events", client_ip = %entry.client_ip, event = %payload, "Transfer event");
    }
}
