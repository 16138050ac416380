//! Offline loopback client configuration from TOML (`[loopback]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw loopback configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoopbackConfig {
    /// Simulated connection setup time in milliseconds
    pub connect_delay_ms: u64,
    /// Simulated delay before the bot answers, in milliseconds
    pub reply_delay_ms: u64,
}

impl Default for FileLoopbackConfig {
    fn default() -> Self {
        Self {
            connect_delay_ms: 300,
            reply_delay_ms: 500,
        }
    }
}

impl FileLoopbackConfig {
    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}
