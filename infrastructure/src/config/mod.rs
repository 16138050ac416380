//! Configuration file loading for voiceai
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `VOICEAI_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./voiceai.toml` or `./.voiceai.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/voiceai/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileConfig, FileJournalConfig, FileLoggingConfig, FileLoopbackConfig,
    FileReplConfig, FileServerConfig, FileStorageConfig, Severity,
};
pub use loader::ConfigLoader;
