//! Voice backend configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};
use voiceai_application::{ClientConfig, DEFAULT_BASE_URL};

/// Raw voice backend configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Base URL of the voice backend
    pub base_url: String,
    /// Capture the microphone once connected
    pub enable_mic: bool,
    /// Seconds to wait for the client to start before failing the attempt
    pub connect_timeout_seconds: Option<u64>,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            enable_mic: true,
            connect_timeout_seconds: Some(30),
        }
    }
}

impl FileServerConfig {
    /// Convert to the application-layer client configuration
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.trim_end_matches('/'))
            .with_mic(self.enable_mic)
            .with_timeout_seconds(self.connect_timeout_seconds)
    }
}
