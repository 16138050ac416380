//! Key-value storage adapters.
//!
//! Implementations of the [`KeyValueStore`](voiceai_application::KeyValueStore)
//! port backing the provider preference.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
