//! Application-level configuration.
//!
//! Settings handed to the realtime client on every connection attempt.

use std::time::Duration;

/// Default voice backend address
pub const DEFAULT_BASE_URL: &str = "http://localhost:8787";

/// Realtime client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the voice backend.
    pub base_url: String,
    /// Capture the microphone once connected.
    pub enable_mic: bool,
    /// Maximum time to wait for the client's start call before failing the attempt.
    pub connect_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the connect timeout in seconds; `None` waits indefinitely.
    pub fn with_timeout_seconds(mut self, seconds: Option<u64>) -> Self {
        self.connect_timeout = seconds.map(Duration::from_secs);
        self
    }

    pub fn with_mic(mut self, enable_mic: bool) -> Self {
        self.enable_mic = enable_mic;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            enable_mic: true,
            connect_timeout: None,
        }
    }
}
