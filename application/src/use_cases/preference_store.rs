//! Preference store
//!
//! Persists the user's LLM provider choice across sessions on top of a
//! [`KeyValueStore`]. Neither operation fails the caller: storage errors
//! and unrecognized stored values degrade to [`LlmProvider::default`].

use crate::ports::key_value_store::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, warn};
use voiceai_domain::LlmProvider;

/// Storage key holding the provider identifier
pub const LLM_PROVIDER_KEY: &str = "llm_provider";

/// Reads and writes the persisted provider preference
#[derive(Clone)]
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persisted provider, or the default when unset, unreadable, or unrecognized.
    ///
    /// Only the exact identifiers `save` writes are recognized.
    pub fn load(&self) -> LlmProvider {
        let raw = match self.store.get_item(LLM_PROVIDER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored LLM provider, using default");
                return LlmProvider::default();
            }
            Err(e) => {
                warn!("Could not read LLM provider preference: {}", e);
                return LlmProvider::default();
            }
        };

        match LlmProvider::from_id(&raw) {
            Ok(provider) => provider,
            Err(e) => {
                warn!("Ignoring stored LLM provider: {}", e);
                LlmProvider::default()
            }
        }
    }

    /// Overwrite the persisted provider.
    pub fn save(&self, provider: LlmProvider) {
        if let Err(e) = self.store.set_item(LLM_PROVIDER_KEY, provider.as_str()) {
            warn!("Could not persist LLM provider '{}': {}", provider, e);
        } else {
            debug!(provider = %provider, "Persisted LLM provider");
        }
    }
}
