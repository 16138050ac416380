//! Session state and its transition function.
//!
//! [`SessionState`] is the single source of truth for the active voice
//! session. It is only mutated through the methods in this module: the UI
//! intents ([`begin_connect`](SessionState::begin_connect),
//! [`reset`](SessionState::reset), [`fail`](SessionState::fail),
//! [`set_provider`](SessionState::set_provider)) and
//! [`apply`](SessionState::apply) for client events.
//!
//! ```text
//!                begin_connect            Connected
//! Disconnected ───────────────▶ Connecting ─────────▶ Connected
//!      ▲                            │                     │
//!      │ reset / Disconnected       │ fail / Error        │ Error
//!      │                            ▼                     ▼
//!      └──────────────────────── Failed ◀─────────────────┘
//!                                   │ begin_connect
//!                                   └────────▶ Connecting
//! ```

use super::event::SessionEvent;
use crate::core::provider::LlmProvider;
use serde::Serialize;

/// Placeholder shown when nothing has been transcribed yet.
pub const PLACEHOLDER_TEXT: &str = "等待输入... | Waiting for input...";

/// Shown after the transport drops underneath an active session.
pub const CONNECTION_LOST_TEXT: &str = "Connection lost";

/// Connection lifecycle of a voice session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Failed => "failed",
        }
    }

    /// A connection attempt is in flight or established.
    pub fn is_active(&self) -> bool {
        matches!(self, ConnectionStatus::Connecting | ConnectionStatus::Connected)
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Text currently shown in the transcript area.
///
/// Overwritten by every transcription event; no history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Transcript {
    #[default]
    Placeholder,
    Text(String),
    ConnectionLost,
}

impl Transcript {
    pub fn as_text(&self) -> &str {
        match self {
            Transcript::Placeholder => PLACEHOLDER_TEXT,
            Transcript::Text(s) => s,
            Transcript::ConnectionLost => CONNECTION_LOST_TEXT,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Transcript::Placeholder)
    }
}

impl std::fmt::Display for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_text())
    }
}

/// Who is currently talking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakingParty {
    User,
    Bot,
}

/// Outcome of feeding an intent or event into [`SessionState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State was mutated.
    Changed,
    /// Valid input that leaves the state as it was (duplicates, idempotent calls).
    Unchanged,
    /// Input does not apply to the current state and was dropped.
    Rejected,
}

impl Transition {
    pub fn is_changed(&self) -> bool {
        matches!(self, Transition::Changed)
    }
}

/// Client-visible state of the voice session (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    connection_status: ConnectionStatus,
    transcript: Transcript,
    llm_provider: LlmProvider,
    last_error: Option<String>,
    speaking: Option<SpeakingParty>,
}

impl SessionState {
    /// Fresh, disconnected state with the given provider selected
    pub fn new(llm_provider: LlmProvider) -> Self {
        Self {
            connection_status: ConnectionStatus::Disconnected,
            transcript: Transcript::Placeholder,
            llm_provider,
            last_error: None,
            speaking: None,
        }
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection_status
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn llm_provider(&self) -> LlmProvider {
        self.llm_provider
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn speaking(&self) -> Option<SpeakingParty> {
        self.speaking
    }

    pub fn is_connected(&self) -> bool {
        self.connection_status == ConnectionStatus::Connected
    }

    // ==================== Intents ====================

    /// Start a connection attempt.
    ///
    /// Duplicate intents while `Connecting` or `Connected` are `Unchanged`.
    pub fn begin_connect(&mut self) -> Transition {
        if self.connection_status.is_active() {
            return Transition::Unchanged;
        }
        self.connection_status = ConnectionStatus::Connecting;
        self.last_error = None;
        self.speaking = None;
        Transition::Changed
    }

    /// Return to `Disconnected` with the placeholder transcript.
    ///
    /// Valid from every state; only reports `Changed` when something differed.
    pub fn reset(&mut self) -> Transition {
        let target = Self::new(self.llm_provider);
        if *self == target {
            return Transition::Unchanged;
        }
        *self = target;
        Transition::Changed
    }

    /// Mark the current attempt or session as failed.
    pub fn fail(&mut self, message: impl Into<String>) -> Transition {
        match self.connection_status {
            ConnectionStatus::Connecting | ConnectionStatus::Connected => {
                self.connection_status = ConnectionStatus::Failed;
                self.last_error = Some(message.into());
                self.speaking = None;
                Transition::Changed
            }
            ConnectionStatus::Failed => {
                self.last_error = Some(message.into());
                Transition::Changed
            }
            ConnectionStatus::Disconnected => Transition::Rejected,
        }
    }

    /// Select the provider for the next connection attempt.
    pub fn set_provider(&mut self, provider: LlmProvider) -> Transition {
        if self.llm_provider == provider {
            return Transition::Unchanged;
        }
        self.llm_provider = provider;
        Transition::Changed
    }

    // ==================== Client events ====================

    /// Apply one client event. Never panics; inapplicable events are `Rejected`.
    pub fn apply(&mut self, event: &SessionEvent) -> Transition {
        match event {
            SessionEvent::Connected => match self.connection_status {
                ConnectionStatus::Connecting => {
                    self.connection_status = ConnectionStatus::Connected;
                    self.last_error = None;
                    Transition::Changed
                }
                ConnectionStatus::Connected => Transition::Unchanged,
                ConnectionStatus::Disconnected | ConnectionStatus::Failed => Transition::Rejected,
            },
            SessionEvent::Disconnected => {
                if self.connection_status == ConnectionStatus::Disconnected {
                    return Transition::Unchanged;
                }
                self.connection_status = ConnectionStatus::Disconnected;
                self.transcript = Transcript::ConnectionLost;
                self.last_error = None;
                self.speaking = None;
                Transition::Changed
            }
            SessionEvent::UserStartedSpeaking => self.start_speaking(SpeakingParty::User),
            SessionEvent::BotStartedSpeaking => self.start_speaking(SpeakingParty::Bot),
            SessionEvent::UserStoppedSpeaking => self.stop_speaking(SpeakingParty::User),
            SessionEvent::BotStoppedSpeaking => self.stop_speaking(SpeakingParty::Bot),
            SessionEvent::UserTranscription(text) | SessionEvent::BotTranscription(text) => {
                let next = Transcript::Text(text.clone());
                if self.transcript == next {
                    return Transition::Unchanged;
                }
                self.transcript = next;
                Transition::Changed
            }
            SessionEvent::Error(message) => self.fail(message.clone()),
        }
    }

    fn start_speaking(&mut self, party: SpeakingParty) -> Transition {
        if !self.is_connected() {
            return Transition::Rejected;
        }
        if self.speaking == Some(party) {
            return Transition::Unchanged;
        }
        self.speaking = Some(party);
        Transition::Changed
    }

    fn stop_speaking(&mut self, party: SpeakingParty) -> Transition {
        if self.speaking != Some(party) {
            return Transition::Unchanged;
        }
        self.speaking = None;
        Transition::Changed
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(LlmProvider::default())
    }
}
