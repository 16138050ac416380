//! Voice session domain.
//!
//! - [`state::SessionState`]: client-visible state of the active session
//! - [`event::SessionEvent`]: callbacks from the realtime client as named transitions

pub mod event;
pub mod state;
