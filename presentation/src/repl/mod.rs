//! Interactive voice session shell

mod command;
mod voice_repl;

pub use command::ReplCommand;
pub use voice_repl::{ReplAction, VoiceRepl};
