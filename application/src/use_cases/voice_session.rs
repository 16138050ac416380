//! Voice session controller
//!
//! Mediates between UI intents and the external realtime client. Owns the
//! [`SessionState`], applies client events to it through the domain
//! transition function, and publishes every change on a `watch` channel for
//! the presentation layer.
//!
//! # Connection attempts
//!
//! Each `connect()` that actually starts the client opens a new *epoch*.
//! The [`EventSink`] handed to the client is bound to that epoch, and
//! `disconnect()`, `teardown()` and failed starts all advance it. Events
//! arriving with an older epoch are dropped, so a late `Connected` from an
//! abandoned attempt can never resurrect the session.
//!
//! # Locking
//!
//! State lives behind a `std::sync::Mutex` that is never held across an
//! `.await` or while calling into the client; the client may emit events
//! from inside `start()` or `stop()`.

use crate::config::ClientConfig;
use crate::ports::realtime_client::{
    ClientError, ClientOptions, EventSink, EventTarget, RealtimeClient,
};
use crate::ports::session_journal::{JournalEntry, NoSessionJournal, SessionJournal};
use crate::use_cases::preference_store::PreferenceStore;
use futures::FutureExt;
use serde_json::{Value, json};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use voiceai_domain::{ConnectionStatus, LlmProvider, SessionEvent, SessionState, Transition};

/// Errors returned from [`VoiceSessionController::connect`].
///
/// By the time one of these is returned the session state already reflects
/// the failure; callers may ignore the value.
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("Failed to connect: {0}")]
    Client(#[from] ClientError),

    #[error("Voice session controller has been torn down")]
    TornDown,
}

struct Inner {
    state: SessionState,
    /// Current connection attempt; events tagged with any other value are stale
    epoch: u64,
    /// Provider requested by the in-flight attempt, persisted once it connects
    pending_provider: Option<LlmProvider>,
    torn_down: bool,
}

struct Shared {
    inner: Mutex<Inner>,
    state_tx: watch::Sender<SessionState>,
    preferences: PreferenceStore,
    journal: Arc<dyn SessionJournal>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        self.state_tx.send_replace(inner.state.clone());
    }

    fn record(&self, entry_type: &'static str, payload: Value) {
        self.journal.record(JournalEntry::new(entry_type, payload));
    }
}

impl EventTarget for Shared {
    fn deliver(&self, epoch: u64, event: SessionEvent) {
        let mut inner = self.lock();

        if inner.torn_down || epoch != inner.epoch {
            debug!(
                epoch,
                current_epoch = inner.epoch,
                event = event.kind(),
                "Ignoring event from superseded connection attempt"
            );
            self.record(
                "event_ignored",
                json!({
                    "epoch": epoch,
                    "current_epoch": inner.epoch,
                    "event": event.kind(),
                }),
            );
            return;
        }

        if event.is_speaking_signal() {
            debug!(event = event.kind(), "Speaking signal");
        }

        let transition = inner.state.apply(&event);
        match (&event, transition) {
            (SessionEvent::Connected, Transition::Changed) => {
                if let Some(provider) = inner.pending_provider.take() {
                    inner.state.set_provider(provider);
                    self.preferences.save(provider);
                }
                info!(provider = %inner.state.llm_provider(), epoch, "Voice session connected");
            }
            (SessionEvent::Disconnected, Transition::Changed) => {
                inner.pending_provider = None;
                // Stragglers from the lost session must not replace "Connection lost"
                inner.epoch += 1;
                info!(epoch, "Voice session disconnected by client");
            }
            (SessionEvent::Error(message), Transition::Changed) => {
                inner.pending_provider = None;
                warn!(epoch, "Voice session error: {}", message);
            }
            (_, Transition::Rejected) => {
                debug!(
                    event = event.kind(),
                    status = %inner.state.connection_status(),
                    "Event does not apply to current state"
                );
            }
            _ => {}
        }

        if transition.is_changed() {
            self.publish(&inner);
        }

        let mut payload = json!({
            "epoch": epoch,
            "event": event.kind(),
            "status": inner.state.connection_status().as_str(),
        });
        if let Some(text) = event.text() {
            payload["text"] = json!(text);
        }
        let entry_type = match transition {
            Transition::Rejected => "event_rejected",
            _ => "event_applied",
        };
        self.record(entry_type, payload);
    }
}

/// Controller for the single active voice session.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct VoiceSessionController {
    client: Arc<dyn RealtimeClient>,
    config: ClientConfig,
    shared: Arc<Shared>,
}

impl VoiceSessionController {
    /// Create a controller, loading the persisted provider preference.
    pub fn new(
        client: Arc<dyn RealtimeClient>,
        preferences: PreferenceStore,
        config: ClientConfig,
    ) -> Self {
        Self::with_journal(client, preferences, config, Arc::new(NoSessionJournal))
    }

    /// Create a controller that records every intent and event to `journal`.
    pub fn with_journal(
        client: Arc<dyn RealtimeClient>,
        preferences: PreferenceStore,
        config: ClientConfig,
        journal: Arc<dyn SessionJournal>,
    ) -> Self {
        let provider = preferences.load();
        let state = SessionState::new(provider);
        let (state_tx, _) = watch::channel(state.clone());

        info!(provider = %provider, base_url = %config.base_url, "Voice session controller initialized");

        Self {
            client,
            config,
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state,
                    epoch: 0,
                    pending_provider: None,
                    torn_down: false,
                }),
                state_tx,
                preferences,
                journal,
            }),
        }
    }

    /// Current state
    pub fn snapshot(&self) -> SessionState {
        self.shared.lock().state.clone()
    }

    /// Observe state changes; the receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state_tx.subscribe()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.shared.preferences
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.lock().torn_down
    }

    /// Start a session with `provider`.
    ///
    /// No-op while a session is `Connecting` or `Connected`. Moves to
    /// `Connecting` immediately; the session becomes `Connected` when the
    /// client emits [`SessionEvent::Connected`]. A failure to start moves the
    /// session to `Failed` before the error is returned.
    pub async fn connect(&self, provider: LlmProvider) -> Result<(), ConnectError> {
        let epoch = {
            let mut inner = self.shared.lock();
            if inner.torn_down {
                return Err(ConnectError::TornDown);
            }
            if inner.state.begin_connect() == Transition::Unchanged {
                debug!(
                    status = %inner.state.connection_status(),
                    "Connect ignored: a session is already active"
                );
                self.shared.record(
                    "connect_ignored",
                    json!({
                        "provider": provider.as_str(),
                        "status": inner.state.connection_status().as_str(),
                    }),
                );
                return Ok(());
            }
            inner.epoch += 1;
            inner.pending_provider = Some(provider);
            self.shared.publish(&inner);
            inner.epoch
        };

        info!(provider = %provider, epoch, base_url = %self.config.base_url, "Connecting voice session");
        self.shared.record(
            "connect_requested",
            json!({ "epoch": epoch, "provider": provider.as_str() }),
        );

        let options = ClientOptions {
            base_url: self.config.base_url.clone(),
            enable_mic: self.config.enable_mic,
            llm_provider: provider,
        };
        let sink = EventSink::new(epoch, self.shared.clone());

        match self.start_client(&options, sink).await {
            Ok(()) => Ok(()),
            Err(error) => self.fail_attempt(epoch, error),
        }
    }

    /// Run the client's start call, converting timeouts and panics into errors.
    async fn start_client(&self, options: &ClientOptions, sink: EventSink) -> Result<(), ClientError> {
        let start = AssertUnwindSafe(self.client.start(options, sink)).catch_unwind();

        let outcome = match self.config.connect_timeout {
            Some(limit) => match tokio::time::timeout(limit, start).await {
                Ok(outcome) => outcome,
                Err(_) => return Err(ClientError::Timeout),
            },
            None => start.await,
        };

        outcome.unwrap_or_else(|_| {
            Err(ClientError::Transport(
                "realtime client panicked while starting".to_string(),
            ))
        })
    }

    fn fail_attempt(&self, epoch: u64, error: ClientError) -> Result<(), ConnectError> {
        {
            let mut inner = self.shared.lock();
            if inner.torn_down || inner.epoch != epoch {
                debug!(epoch, "Start failure for superseded connection attempt: {}", error);
                self.shared.record(
                    "connect_failed_ignored",
                    json!({ "epoch": epoch, "error": error.to_string() }),
                );
                return Ok(());
            }

            inner.pending_provider = None;
            // An Error event from the client may already have described the failure
            if inner.state.connection_status() != ConnectionStatus::Failed {
                inner.state.fail(error.to_string());
            }
            // Callbacks still in flight for this attempt are stale from here on
            inner.epoch += 1;
            self.shared.publish(&inner);

            warn!(epoch, "Voice session failed to connect: {}", error);
            self.shared.record(
                "connect_failed",
                json!({ "epoch": epoch, "error": error.to_string() }),
            );
        }

        if error.is_timeout() {
            self.client.stop();
        }
        Err(ConnectError::Client(error))
    }

    /// End the session from any state.
    ///
    /// Always leaves the session `Disconnected` with the placeholder
    /// transcript and no error. The client is only told to stop when there
    /// was something to stop.
    pub fn disconnect(&self) {
        let was_idle = {
            let mut inner = self.shared.lock();
            let was_idle = inner.state.connection_status() == ConnectionStatus::Disconnected;
            if !was_idle {
                inner.epoch += 1;
            }
            inner.pending_provider = None;
            if inner.state.reset().is_changed() {
                self.shared.publish(&inner);
            }
            was_idle
        };

        if was_idle {
            debug!("Disconnect requested with no active session");
            return;
        }

        info!("Disconnecting voice session");
        self.shared.record("disconnect_requested", json!({}));
        self.client.stop();
    }

    /// Select the provider for the next connection attempt and persist it.
    ///
    /// An explicit choice also supersedes the provider of an attempt that is
    /// still connecting.
    pub fn set_provider(&self, provider: LlmProvider) {
        let mut inner = self.shared.lock();
        inner.pending_provider = None;
        self.shared.preferences.save(provider);

        if inner.state.set_provider(provider).is_changed() {
            info!(provider = %provider, "LLM provider changed");
            self.shared.publish(&inner);
        }
        self.shared.record(
            "provider_selected",
            json!({ "provider": provider.as_str() }),
        );
    }

    /// Stop the client and detach from it for good.
    ///
    /// Later events are ignored and `connect()` returns [`ConnectError::TornDown`].
    pub fn teardown(&self) {
        {
            let mut inner = self.shared.lock();
            if inner.torn_down {
                return;
            }
            inner.torn_down = true;
            inner.epoch += 1;
            inner.pending_provider = None;
            if inner.state.reset().is_changed() {
                self.shared.publish(&inner);
            }
        }

        info!("Voice session controller torn down");
        self.shared.record("teardown", json!({}));
        self.client.stop();
    }
}
