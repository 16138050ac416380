//! Realtime client port
//!
//! Defines the interface to the external voice/LLM client: the collaborator
//! that owns audio capture, transport, speech recognition and synthesis.
//! The application layer only starts it, stops it, and consumes its
//! callbacks through an [`EventSink`].
//!
//! # Flow
//!
//! ```text
//! VoiceSessionController::connect()
//!        ↓
//! RealtimeClient::start(options, sink)      (async, may fail)
//!        ↓
//! sink.emit(SessionEvent::Connected)        (any time, from the client)
//!        ↓
//! EventTarget::deliver(epoch, event)        (controller applies or ignores)
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use voiceai_domain::{LlmProvider, SessionEvent};

/// Errors raised by a realtime client while setting up a connection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("timeout")]
    Timeout,

    #[error("Server rejected the session (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl ClientError {
    /// Check if this error represents a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout)
    }
}

/// Construction parameters handed to the client for one connection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Base URL of the voice backend
    pub base_url: String,
    /// Capture the microphone once connected
    pub enable_mic: bool,
    /// LLM the backend should use for this session
    pub llm_provider: LlmProvider,
}

/// Receiver side of an [`EventSink`].
///
/// Implemented by the session controller. `epoch` identifies the connection
/// attempt the sink was created for.
pub trait EventTarget: Send + Sync {
    fn deliver(&self, epoch: u64, event: SessionEvent);
}

/// Callback bundle handed to [`RealtimeClient::start`].
///
/// Bound to a single connection attempt. Emitting is synchronous: the event
/// has been applied (or ignored as stale) by the time `emit` returns, so
/// events are observed in exactly the order the client emits them.
#[derive(Clone)]
pub struct EventSink {
    epoch: u64,
    target: Arc<dyn EventTarget>,
}

impl EventSink {
    pub fn new(epoch: u64, target: Arc<dyn EventTarget>) -> Self {
        Self { epoch, target }
    }

    /// Connection attempt this sink belongs to
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn emit(&self, event: SessionEvent) {
        self.target.deliver(self.epoch, event);
    }

    pub fn connected(&self) {
        self.emit(SessionEvent::Connected);
    }

    pub fn disconnected(&self) {
        self.emit(SessionEvent::Disconnected);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(SessionEvent::Error(message.into()));
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

/// External realtime voice client.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait RealtimeClient: Send + Sync {
    /// Begin audio capture and transport for a new session.
    ///
    /// Resolving `Ok` means the start request was accepted; the session is
    /// only live once the client emits [`SessionEvent::Connected`] on `events`.
    async fn start(&self, options: &ClientOptions, events: EventSink) -> Result<(), ClientError>;

    /// Stop capture and tear down the transport. Safe to call when idle.
    fn stop(&self);
}

/// Typed utterances fed into an active session in place of microphone audio.
///
/// Offered by clients that can simulate speech (the offline loopback);
/// the resulting speaking and transcription events arrive on the session's
/// [`EventSink`] like any other.
#[async_trait]
pub trait TextInput: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<(), ClientError>;
}
