//! In-process loopback client
//!
//! Stands in for a real voice backend: "connects" after a short delay and
//! answers each typed utterance by echoing it back as the bot. Used for
//! `--offline` mode and for exercising the controller without a server.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use voiceai_application::{ClientError, ClientOptions, EventSink, RealtimeClient, TextInput};
use voiceai_domain::SessionEvent;

struct ActiveSession {
    sink: EventSink,
    cancel: CancellationToken,
    connected: bool,
}

#[derive(Default)]
struct LoopbackState {
    active: Option<ActiveSession>,
    /// Error returned by the next `start()` instead of connecting
    fail_next: Option<ClientError>,
}

/// Simulated realtime client with no network or audio.
pub struct LoopbackClient {
    connect_delay: Duration,
    reply_delay: Duration,
    state: Mutex<LoopbackState>,
}

impl LoopbackClient {
    pub fn new(connect_delay: Duration, reply_delay: Duration) -> Self {
        Self {
            connect_delay,
            reply_delay,
            state: Mutex::new(LoopbackState::default()),
        }
    }

    /// Client that connects and replies without delay
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Make the next `start()` fail with `error`.
    pub fn fail_next_start(&self, error: ClientError) {
        self.lock().fail_next = Some(error);
    }

    pub fn is_connected(&self) -> bool {
        self.lock().active.as_ref().is_some_and(|a| a.connected)
    }

    /// Simulate the remote side dropping the session.
    pub fn hang_up(&self) {
        let active = self.lock().active.take();
        if let Some(active) = active {
            info!("Loopback session hung up by remote");
            active.cancel.cancel();
            active.sink.disconnected();
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoopbackState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn connected_session(&self) -> Result<(EventSink, CancellationToken), ClientError> {
        match &self.lock().active {
            Some(active) if active.connected => Ok((active.sink.clone(), active.cancel.clone())),
            _ => Err(ClientError::Connection(
                "loopback session is not connected".to_string(),
            )),
        }
    }
}

impl Default for LoopbackClient {
    fn default() -> Self {
        Self::new(Duration::from_millis(300), Duration::from_millis(500))
    }
}

#[async_trait]
impl RealtimeClient for LoopbackClient {
    async fn start(&self, options: &ClientOptions, events: EventSink) -> Result<(), ClientError> {
        let cancel = CancellationToken::new();
        {
            let mut state = self.lock();
            if let Some(error) = state.fail_next.take() {
                debug!("Loopback start failing on request: {}", error);
                return Err(error);
            }
            if let Some(previous) = state.active.replace(ActiveSession {
                sink: events.clone(),
                cancel: cancel.clone(),
                connected: false,
            }) {
                previous.cancel.cancel();
            }
        }

        info!(
            provider = %options.llm_provider,
            mic = options.enable_mic,
            "Loopback session starting"
        );

        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Loopback start cancelled");
                return Ok(());
            }
            _ = tokio::time::sleep(self.connect_delay) => {}
        }

        {
            let mut state = self.lock();
            match state.active.as_mut() {
                Some(active) if active.sink.epoch() == events.epoch() => active.connected = true,
                _ => return Ok(()),
            }
        }
        events.connected();
        Ok(())
    }

    fn stop(&self) {
        let active = self.lock().active.take();
        if let Some(active) = active {
            debug!(epoch = active.sink.epoch(), "Loopback session stopped");
            active.cancel.cancel();
            active.sink.disconnected();
        }
    }
}

#[async_trait]
impl TextInput for LoopbackClient {
    /// Plays out one user turn and the bot's echo.
    async fn send_text(&self, text: &str) -> Result<(), ClientError> {
        let (sink, cancel) = self.connected_session()?;

        sink.emit(SessionEvent::UserStartedSpeaking);
        sink.emit(SessionEvent::UserTranscription(text.to_string()));
        sink.emit(SessionEvent::UserStoppedSpeaking);

        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            _ = tokio::time::sleep(self.reply_delay) => {}
        }

        sink.emit(SessionEvent::BotStartedSpeaking);
        sink.emit(SessionEvent::BotTranscription(format!("Echo: {}", text)));
        sink.emit(SessionEvent::BotStoppedSpeaking);
        Ok(())
    }
}
