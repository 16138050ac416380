//! Presentation-level configuration
//!
//! Configuration for REPL behavior.

use std::path::PathBuf;

/// REPL configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Show the connecting spinner
    pub show_progress: bool,
    /// Colored terminal output
    pub color: bool,
    /// Path to history file; history is not kept when unset
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            color: true,
            history_file: None,
        }
    }
}
