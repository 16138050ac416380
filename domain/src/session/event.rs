//! Events delivered by the realtime client.

/// A named transition emitted by the external realtime client.
///
/// One variant per callback in the client's callback bundle. Events are
/// applied to [`SessionState`](super::state::SessionState) in the order the
/// client emits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Transport is up and the bot is ready.
    Connected,
    /// Transport went away (remote hangup, network loss, or local stop).
    Disconnected,
    UserStartedSpeaking,
    UserStoppedSpeaking,
    BotStartedSpeaking,
    BotStoppedSpeaking,
    /// Speech-to-text result for the user's utterance.
    UserTranscription(String),
    /// Text of the bot's spoken response.
    BotTranscription(String),
    /// Client-side or server-side failure, carrying a readable description.
    Error(String),
}

impl SessionEvent {
    /// Short identifier used in logs and the session journal
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::Connected => "connected",
            SessionEvent::Disconnected => "disconnected",
            SessionEvent::UserStartedSpeaking => "user_started_speaking",
            SessionEvent::UserStoppedSpeaking => "user_stopped_speaking",
            SessionEvent::BotStartedSpeaking => "bot_started_speaking",
            SessionEvent::BotStoppedSpeaking => "bot_stopped_speaking",
            SessionEvent::UserTranscription(_) => "user_transcription",
            SessionEvent::BotTranscription(_) => "bot_transcription",
            SessionEvent::Error(_) => "error",
        }
    }

    /// Returns the text carried by transcription and error events.
    pub fn text(&self) -> Option<&str> {
        match self {
            SessionEvent::UserTranscription(s)
            | SessionEvent::BotTranscription(s)
            | SessionEvent::Error(s) => Some(s),
            _ => None,
        }
    }

    /// Speaking signals carry no state in the core contract beyond the
    /// optional speaking indicator.
    pub fn is_speaking_signal(&self) -> bool {
        matches!(
            self,
            SessionEvent::UserStartedSpeaking
                | SessionEvent::UserStoppedSpeaking
                | SessionEvent::BotStartedSpeaking
                | SessionEvent::BotStoppedSpeaking
        )
    }
}
