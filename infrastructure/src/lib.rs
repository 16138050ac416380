//! Infrastructure layer for voiceai
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod client;
pub mod config;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use client::LoopbackClient;
#[cfg(feature = "rtvi-http")]
pub use client::RtviHttpClient;
pub use config::{
    ConfigIssue, ConfigLoader, FileConfig, FileJournalConfig, FileLoggingConfig,
    FileLoopbackConfig, FileReplConfig, FileServerConfig, FileStorageConfig, Severity,
};
pub use logging::JsonlSessionJournal;
pub use storage::{JsonFileStore, MemoryStore};
