//! Diagnostic logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Also write tracing output to this file
    pub file: Option<String>,
    /// Filter directive used when neither `-v` nor `RUST_LOG` is given (e.g. "info")
    pub level: Option<String>,
}

impl FileLoggingConfig {
    pub fn resolved_file(&self) -> Option<PathBuf> {
        self.file.as_deref().map(super::expand_home)
    }
}
