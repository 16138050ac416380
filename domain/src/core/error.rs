//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unrecognized LLM provider: {0:?}")]
    UnrecognizedProvider(String),
}

impl DomainError {
    /// Check if this error came from an unknown provider identifier
    pub fn is_unrecognized_provider(&self) -> bool {
        matches!(self, DomainError::UnrecognizedProvider(_))
    }
}
