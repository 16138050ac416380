//! RTVI HTTP handshake client
//!
//! Performs the session start request of an RTVI voice backend:
//!
//! ```text
//! POST {base_url}/connect
//! {"services": {"llm": "glm"}, "enable_mic": true}
//! ```
//!
//! A 2xx answer means the bot is ready and `Connected` is emitted. Media
//! transport and audio are not handled here. `stop()` or a newer `start()`
//! abandons a handshake that is still in flight.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use voiceai_application::{ClientError, ClientOptions, EventSink, RealtimeClient};

/// Longest error body echoed into a `Rejected` message
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Serialize)]
struct ConnectRequest<'a> {
    services: Services<'a>,
    enable_mic: bool,
}

#[derive(Debug, Serialize)]
struct Services<'a> {
    llm: &'a str,
}

/// The attempt `start()` is currently running or has connected
struct ActiveAttempt {
    sink: EventSink,
    cancel: CancellationToken,
    connected: bool,
}

/// Realtime client speaking the RTVI start handshake over HTTP.
pub struct RtviHttpClient {
    http: reqwest::Client,
    active: Mutex<Option<ActiveAttempt>>,
}

impl RtviHttpClient {
    /// Create a client whose requests give up after `timeout`.
    pub fn new(timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("voiceai/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            active: Mutex::new(None),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.active().as_ref().is_some_and(|a| a.connected)
    }

    fn active(&self) -> MutexGuard<'_, Option<ActiveAttempt>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Forget the attempt for `epoch` if it is still the active one.
    fn clear_attempt(&self, epoch: u64) {
        let mut active = self.active();
        if active.as_ref().is_some_and(|a| a.sink.epoch() == epoch) {
            *active = None;
        }
    }

    async fn handshake(&self, url: &str, request: &ConnectRequest<'_>) -> Result<(), ClientError> {
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                truncate_body(&body)
            };
            warn!(status = status.as_u16(), "RTVI session rejected: {}", message);
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!(status = status.as_u16(), "RTVI session accepted");
        Ok(())
    }
}

fn connect_url(base_url: &str) -> String {
    format!("{}/connect", base_url.trim_end_matches('/'))
}

fn map_request_error(error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::Timeout
    } else if error.is_connect() {
        ClientError::Connection(error.to_string())
    } else {
        ClientError::Transport(error.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[async_trait]
impl RealtimeClient for RtviHttpClient {
    async fn start(&self, options: &ClientOptions, events: EventSink) -> Result<(), ClientError> {
        let url = connect_url(&options.base_url);
        let request = ConnectRequest {
            services: Services {
                llm: options.llm_provider.as_str(),
            },
            enable_mic: options.enable_mic,
        };

        let cancel = CancellationToken::new();
        let previous = self.active().replace(ActiveAttempt {
            sink: events.clone(),
            cancel: cancel.clone(),
            connected: false,
        });
        if let Some(previous) = previous {
            debug!(epoch = previous.sink.epoch(), "Superseding previous RTVI attempt");
            previous.cancel.cancel();
        }

        info!(url = %url, provider = %options.llm_provider, "Starting RTVI session");

        // Dropping the request future aborts the handshake
        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                debug!(epoch = events.epoch(), "RTVI start cancelled");
                return Ok(());
            }
            outcome = self.handshake(&url, &request) => outcome,
        };

        if let Err(error) = outcome {
            self.clear_attempt(events.epoch());
            return Err(error);
        }

        {
            let mut active = self.active();
            match active.as_mut() {
                Some(attempt) if attempt.sink.epoch() == events.epoch() => attempt.connected = true,
                _ => return Ok(()),
            }
        }
        events.connected();
        Ok(())
    }

    fn stop(&self) {
        let active = self.active().take();
        if let Some(attempt) = active {
            debug!(epoch = attempt.sink.epoch(), "RTVI session stopped");
            attempt.cancel.cancel();
            attempt.sink.disconnected();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use voiceai_application::EventTarget;
    use voiceai_domain::{LlmProvider, SessionEvent};

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<SessionEvent>>,
    }

    impl EventTarget for Recorder {
        fn deliver(&self, _epoch: u64, event: SessionEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    /// Holds the response until the test releases it
    struct Hold {
        received: oneshot::Sender<()>,
        release: oneshot::Receiver<()>,
    }

    /// Serves a single HTTP request with a canned response and returns the
    /// request body it received.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        serve(status_line, body, None).await
    }

    async fn serve(
        status_line: &'static str,
        body: &'static str,
        hold: Option<Hold>,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let request_body = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(split) = text.find("\r\n\r\n") {
                    let content_length = text[..split]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    let body = &buf[split + 4..];
                    if body.len() >= content_length {
                        break String::from_utf8_lossy(body).to_string();
                    }
                }
                if n == 0 {
                    break String::new();
                }
            };

            if let Some(hold) = hold {
                let _ = hold.received.send(());
                let _ = hold.release.await;
            }

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            // The client may already have hung up
            socket.write_all(response.as_bytes()).await.ok();
            socket.shutdown().await.ok();
            request_body
        });

        (base_url, handle)
    }

    fn options(base_url: String) -> ClientOptions {
        ClientOptions {
            base_url,
            enable_mic: false,
            llm_provider: LlmProvider::Glm,
        }
    }

    #[test]
    fn test_connect_url_trims_trailing_slash() {
        assert_eq!(connect_url("http://x:8787/"), "http://x:8787/connect");
        assert_eq!(connect_url("http://x:8787"), "http://x:8787/connect");
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let long = "错".repeat(100);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= MAX_ERROR_BODY + 3);
    }

    #[tokio::test]
    async fn test_accepted_session_emits_connected_and_sends_provider() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", "{}").await;
        let recorder = Arc::new(Recorder::default());
        let client = RtviHttpClient::new(Some(Duration::from_secs(5))).unwrap();

        client
            .start(&options(base_url), EventSink::new(1, recorder.clone()))
            .await
            .unwrap();

        let body: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(body["services"]["llm"], "glm");
        assert_eq!(body["enable_mic"], false);
        assert_eq!(*recorder.events.lock().unwrap(), vec![SessionEvent::Connected]);

        client.stop();
        assert_eq!(
            recorder.events.lock().unwrap().last(),
            Some(&SessionEvent::Disconnected)
        );
    }

    #[tokio::test]
    async fn test_rejected_session_maps_status_and_body() {
        let (base_url, server) =
            serve_once("HTTP/1.1 503 Service Unavailable", "no bots available").await;
        let recorder = Arc::new(Recorder::default());
        let client = RtviHttpClient::new(None).unwrap();

        let err = client
            .start(&options(base_url), EventSink::new(1, recorder.clone()))
            .await
            .unwrap_err();
        server.await.unwrap();

        assert_eq!(
            err,
            ClientError::Rejected {
                status: 503,
                message: "no bots available".to_string()
            }
        );
        assert!(recorder.events.lock().unwrap().is_empty());

        // Nothing was connected, so stop reports nothing
        client.stop();
        assert!(recorder.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stop_during_pending_start_abandons_attempt() {
        let (received_tx, received_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        let hold = Hold {
            received: received_tx,
            release: release_rx,
        };
        let (base_url, server) = serve("HTTP/1.1 200 OK", "{}", Some(hold)).await;
        let recorder = Arc::new(Recorder::default());
        let client = Arc::new(RtviHttpClient::new(None).unwrap());

        let pending = tokio::spawn({
            let client = client.clone();
            let sink = EventSink::new(1, recorder.clone());
            async move { client.start(&options(base_url), sink).await }
        });
        received_rx.await.unwrap();

        client.stop();
        assert_eq!(pending.await.unwrap(), Ok(()));
        let _ = release_tx.send(());
        server.await.unwrap();

        assert!(!client.is_connected());
        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec![SessionEvent::Disconnected]
        );

        // Nothing is left behind for a later stop to report
        client.stop();
        assert_eq!(recorder.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_newer_start_supersedes_pending_attempt() {
        let (received_tx, received_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        let hold = Hold {
            received: received_tx,
            release: release_rx,
        };
        let (slow_url, slow_server) = serve("HTTP/1.1 200 OK", "{}", Some(hold)).await;
        let (fast_url, fast_server) = serve_once("HTTP/1.1 200 OK", "{}").await;
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        let client = Arc::new(RtviHttpClient::new(None).unwrap());

        let pending = tokio::spawn({
            let client = client.clone();
            let sink = EventSink::new(1, first.clone());
            async move { client.start(&options(slow_url), sink).await }
        });
        received_rx.await.unwrap();

        client
            .start(&options(fast_url), EventSink::new(2, second.clone()))
            .await
            .unwrap();
        fast_server.await.unwrap();
        assert_eq!(pending.await.unwrap(), Ok(()));
        let _ = release_tx.send(());
        slow_server.await.unwrap();

        assert!(first.events.lock().unwrap().is_empty());
        assert_eq!(*second.events.lock().unwrap(), vec![SessionEvent::Connected]);
        assert!(client.is_connected());

        client.stop();
        assert!(first.events.lock().unwrap().is_empty());
        assert_eq!(
            second.events.lock().unwrap().last(),
            Some(&SessionEvent::Disconnected)
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = RtviHttpClient::new(Some(Duration::from_secs(5))).unwrap();
        let err = client
            .start(
                &options(base_url),
                EventSink::new(1, Arc::new(Recorder::default())),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Connection(_)), "{:?}", err);
    }
}
