//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod key_value_store;
pub mod realtime_client;
pub mod session_journal;
