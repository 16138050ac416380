//! Domain layer for voiceai
//!
//! This crate contains the session state machine and the provider value
//! object. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Session**: one continuous attempt at a voice conversation, from a
//!   connect intent to the next `Disconnected` or `Failed` state
//! - **Provider**: the backend LLM service selected for a session
//! - **Transcript**: the most recently received user or bot text

pub mod core;
pub mod session;

// Re-export commonly used types
pub use core::{error::DomainError, provider::LlmProvider};
pub use session::{
    event::SessionEvent,
    state::{
        CONNECTION_LOST_TEXT, ConnectionStatus, PLACEHOLDER_TEXT, SessionState, SpeakingParty,
        Transcript, Transition,
    },
};
