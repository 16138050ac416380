//! REPL configuration from TOML (`[repl]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show the spinner while connecting
    pub show_progress: bool,
    /// Colored status output
    pub color: bool,
    /// Path to history file; `<data dir>/voiceai/history.txt` when unset
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            color: true,
            history_file: None,
        }
    }
}

impl FileReplConfig {
    pub fn resolved_history_file(&self) -> Option<PathBuf> {
        match &self.history_file {
            Some(path) => Some(super::expand_home(path)),
            None => dirs::data_dir().map(|d| d.join("voiceai").join("history.txt")),
        }
    }
}
