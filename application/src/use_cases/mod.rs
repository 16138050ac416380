//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod preference_store;
pub mod voice_session;
