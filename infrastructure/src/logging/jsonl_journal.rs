//! JSONL file writer for session journal entries.
//!
//! Each [`JournalEntry`] is serialized as a single JSON line with a `type`
//! field and `timestamp`, appended to the file via a buffered writer.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use voiceai_application::{JournalEntry, SessionJournal};

/// Session journal that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every entry and
/// on `Drop`.
pub struct JsonlSessionJournal {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlSessionJournal {
    /// Open (or create) a journal at the given path.
    ///
    /// Existing content is kept; new entries are appended. Returns `None`
    /// if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create session journal directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open session journal {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// `<data dir>/voiceai/journal/<UTC timestamp>.jsonl`, one file per run
    pub fn default_path() -> Option<PathBuf> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
        dirs::data_dir().map(|d| {
            d.join("voiceai")
                .join("journal")
                .join(format!("{}.jsonl", stamp))
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionJournal for JsonlSessionJournal {
    fn record(&self, entry: JournalEntry) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = if let serde_json::Value::Object(mut map) = entry.payload {
            map.insert(
                "type".to_string(),
                serde_json::Value::String(entry.entry_type.to_string()),
            );
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
            serde_json::Value::Object(map)
        } else {
            serde_json::json!({
                "type": entry.entry_type,
                "timestamp": timestamp,
                "data": entry.payload,
            })
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlSessionJournal {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_journal_writes_typed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let journal = JsonlSessionJournal::new(&path).unwrap();

        journal.record(JournalEntry::new(
            "connect_requested",
            json!({ "provider": "glm", "epoch": 1 }),
        ));
        journal.record(JournalEntry::new(
            "event_applied",
            json!({ "event": "connected", "status": "connected" }),
        ));
        drop(journal);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "connect_requested");
        assert_eq!(lines[0]["provider"], "glm");
        assert_eq!(lines[1]["status"], "connected");
        for line in &lines {
            assert!(line["timestamp"].as_str().unwrap().ends_with('Z'));
        }
    }

    #[test]
    fn test_journal_wraps_non_object_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let journal = JsonlSessionJournal::new(&path).unwrap();

        journal.record(JournalEntry::new("teardown", json!("bye")));
        drop(journal);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "teardown");
        assert_eq!(lines[0]["data"], "bye");
    }

    #[test]
    fn test_journal_appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.jsonl");

        for n in 0..2 {
            let journal = JsonlSessionJournal::new(&path).unwrap();
            journal.record(JournalEntry::new("provider_selected", json!({ "n": n })));
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["n"], 1);
    }

    #[test]
    fn test_journal_unwritable_path_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        assert!(JsonlSessionJournal::new(blocker.join("session.jsonl")).is_none());
    }

    #[test]
    fn test_default_path_is_jsonl() {
        if let Some(path) = JsonlSessionJournal::default_path() {
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jsonl"));
        }
    }
}
