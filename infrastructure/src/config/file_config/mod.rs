//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application types where
//! one exists.

mod journal;
mod logging;
mod loopback;
mod repl;
mod server;
mod storage;

pub use journal::FileJournalConfig;
pub use logging::FileLoggingConfig;
pub use loopback::FileLoopbackConfig;
pub use repl::FileReplConfig;
pub use server::FileServerConfig;
pub use storage::FileStorageConfig;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Voice backend settings
    pub server: FileServerConfig,
    /// Preference storage settings
    pub storage: FileStorageConfig,
    /// Session journal settings
    pub journal: FileJournalConfig,
    /// Diagnostic logging settings
    pub logging: FileLoggingConfig,
    /// Offline loopback client settings
    pub loopback: FileLoopbackConfig,
    /// Interactive shell settings
    pub repl: FileReplConfig,
}

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// A detected issue in the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted key the issue is about (e.g., `"server.base_url"`)
    pub field: &'static str,
    pub message: String,
}

impl ConfigIssue {
    fn warning(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field,
            message: message.into(),
        }
    }

    fn error(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field,
            message: message.into(),
        }
    }
}

impl FileConfig {
    /// Validate the configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let base_url = self.server.base_url.trim();
        if base_url.is_empty() {
            issues.push(ConfigIssue::error(
                "server.base_url",
                "server.base_url is empty",
            ));
        } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            issues.push(ConfigIssue::warning(
                "server.base_url",
                format!(
                    "server.base_url: '{}' is not an http(s) URL, connection attempts will fail",
                    base_url
                ),
            ));
        }

        if self.server.connect_timeout_seconds == Some(0) {
            issues.push(ConfigIssue::warning(
                "server.connect_timeout_seconds",
                "server.connect_timeout_seconds is 0, every connection attempt will time out",
            ));
        }

        if self.journal.path.is_some() && !self.journal.enabled {
            issues.push(ConfigIssue::warning(
                "journal.path",
                "journal.path is set but journal.enabled is false",
            ));
        }

        issues
    }
}

/// Expand a leading `~/` to the home directory
pub(crate) fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[server]
base_url = "https://voice.example.com"
enable_mic = false
connect_timeout_seconds = 15

[storage]
path = "/tmp/voiceai/storage.json"

[journal]
enabled = true
path = "/tmp/voiceai/journal.jsonl"

[logging]
file = "/tmp/voiceai/voiceai.log"
level = "debug"

[loopback]
connect_delay_ms = 0
reply_delay_ms = 10
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.base_url, "https://voice.example.com");
        assert!(!config.server.enable_mic);
        assert_eq!(config.server.connect_timeout_seconds, Some(15));
        assert_eq!(
            config.storage.path.as_deref(),
            Some("/tmp/voiceai/storage.json")
        );
        assert!(config.journal.enabled);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.loopback.reply_delay_ms, 10);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[server]
enable_mic = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.server.enable_mic);
        // Defaults should apply
        assert_eq!(config.server.base_url, "http://localhost:8787");
        assert_eq!(config.server.connect_timeout_seconds, Some(30));
        assert!(!config.journal.enabled);
        assert_eq!(config.loopback, FileLoopbackConfig::default());
    }

    #[test]
    fn test_validate_default_config() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_bad_server_settings() {
        let mut config = FileConfig::default();
        config.server.base_url = "ws://localhost:8787".to_string();
        config.server.connect_timeout_seconds = Some(0);

        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
        assert_eq!(issues[0].field, "server.base_url");
        assert_eq!(issues[1].field, "server.connect_timeout_seconds");

        config.server.base_url = "  ".to_string();
        let issues = config.validate();
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_validate_journal_path_without_enabled() {
        let mut config = FileConfig::default();
        config.journal.path = Some("journal.jsonl".to_string());
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "journal.path");
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/var/lib/x"), PathBuf::from("/var/lib/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/x.json"), home.join("x.json"));
        }
    }
}
