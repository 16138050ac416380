//! Application layer for voiceai
//!
//! This crate contains the voice session controller, the preference store,
//! port definitions, and client configuration. It depends only on the
//! domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use ports::{
    key_value_store::{KeyValueStore, StorageError},
    realtime_client::{
        ClientError, ClientOptions, EventSink, EventTarget, RealtimeClient, TextInput,
    },
    session_journal::{JournalEntry, NoSessionJournal, SessionJournal},
};
pub use use_cases::preference_store::{LLM_PROVIDER_KEY, PreferenceStore};
pub use use_cases::voice_session::{ConnectError, VoiceSessionController};
