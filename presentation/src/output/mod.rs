//! Terminal output formatting

pub mod state_formatter;
