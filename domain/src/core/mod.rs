//! Core domain concepts shared across all subdomains.
//!
//! - [`provider::LlmProvider`]: backend LLM services a session can use
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod provider;
