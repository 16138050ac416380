//! Preference storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Path of the JSON key-value file; platform data dir when unset
    pub path: Option<String>,
}

impl FileStorageConfig {
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) => Some(super::expand_home(path)),
            None => crate::storage::JsonFileStore::default_path(),
        }
    }
}
