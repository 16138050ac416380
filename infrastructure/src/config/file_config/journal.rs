//! Session journal configuration from TOML (`[journal]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw session journal configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJournalConfig {
    /// Record intents and client events as JSONL
    pub enabled: bool,
    /// Journal file; `<data dir>/voiceai/journal/<timestamp>.jsonl` when unset
    pub path: Option<String>,
}

impl FileJournalConfig {
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) => Some(super::expand_home(path)),
            None => crate::logging::JsonlSessionJournal::default_path(),
        }
    }
}
