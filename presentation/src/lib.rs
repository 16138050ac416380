//! Presentation layer for voiceai
//!
//! This crate contains CLI definitions, the session state formatter,
//! the connecting spinner, and the interactive voice shell.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;
pub mod repl;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use config::ReplConfig;
pub use output::state_formatter::StateFormatter;
pub use progress::spinner::ConnectSpinner;
pub use repl::{ReplAction, ReplCommand, VoiceRepl};
