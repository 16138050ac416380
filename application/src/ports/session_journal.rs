//! Port for the structured session journal.
//!
//! Defines the [`SessionJournal`] trait for recording lifecycle intents and
//! client events (connect, disconnect, transcriptions, errors, ignored
//! late callbacks) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while the journal keeps a machine-readable
//! record of what the controller did with each input (JSONL).

use serde_json::Value;

/// A structured journal entry.
///
/// Each entry has a type string and a JSON payload containing
/// entry-specific fields. Adapters add the timestamp.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    /// Entry type identifier (e.g., "connect_requested", "event_applied", "event_ignored").
    pub entry_type: &'static str,
    /// JSON payload with entry-specific data.
    pub payload: Value,
}

impl JournalEntry {
    pub fn new(entry_type: &'static str, payload: Value) -> Self {
        Self {
            entry_type,
            payload,
        }
    }
}

/// Port for recording journal entries.
///
/// `record` is synchronous and non-fallible so it can be called from inside
/// event delivery; adapters swallow their own write failures.
pub trait SessionJournal: Send + Sync {
    fn record(&self, entry: JournalEntry);
}

/// No-op implementation for tests and when the journal is disabled.
pub struct NoSessionJournal;

impl SessionJournal for NoSessionJournal {
    fn record(&self, _entry: JournalEntry) {}
}
