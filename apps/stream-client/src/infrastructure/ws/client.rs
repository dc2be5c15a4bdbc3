//! Push-Channel Stream Client
//!
//! Owns the single WebSocket connection to the dashboard backend and
//! keeps it alive: establish, detect loss, re-establish with bounded
//! exponential backoff. Decoded notifications are handed to the
//! [`NotificationHub`] synchronously; everything else about a frame's
//! payload is the consumers' business.
//!
//! Transport failures never surface to callers of [`StreamClient::connect`]
//! or [`StreamClient::disconnect`]; they are absorbed into the retry
//! cycle. A dashboard session must never crash because the live-update
//! channel blinked — the worst visible symptom is staleness until the
//! next successful reconnect.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use super::codec::JsonCodec;
use super::reconnect::{ReconnectConfig, ReconnectPolicy};
use crate::domain::connection::ConnectionState;
use crate::infrastructure::hub::NotificationHub;

/// Default push-channel endpoint.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080/ws";

/// Configuration for the stream client.
#[derive(Debug, Clone)]
pub struct StreamClientConfig {
    /// Push-channel endpoint URL.
    pub endpoint: String,
    /// Reconnection backoff configuration.
    pub reconnect: ReconnectConfig,
}

impl Default for StreamClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            reconnect: ReconnectConfig::default(),
        }
    }
}

impl StreamClientConfig {
    /// Create a configuration for the given endpoint with default
    /// backoff.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            reconnect: ReconnectConfig::default(),
        }
    }
}

/// Client for the dashboard's live-update push channel.
///
/// At most one transport connection exists at any time. `connect`
/// spawns the connection task and returns immediately; the task loops
/// connect → read frames → backoff until `disconnect` cancels it.
/// Connection state is observable through a watch channel.
pub struct StreamClient {
    config: StreamClientConfig,
    hub: Arc<NotificationHub>,
    state_tx: watch::Sender<ConnectionState>,
    session: parking_lot::Mutex<Option<CancellationToken>>,
}

impl StreamClient {
    /// Create a new stream client publishing into `hub`.
    #[must_use]
    pub fn new(config: StreamClientConfig, hub: Arc<NotificationHub>) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            config,
            hub,
            state_tx,
            session: parking_lot::Mutex::new(None),
        }
    }

    /// Request a connection to the configured endpoint.
    ///
    /// Idempotent intent: if a session is already running this is a
    /// no-op. A prior manual close is cleared — the retry cycle starts
    /// fresh. Never blocks; the outcome of the attempt is observable
    /// via [`Self::state_changes`].
    pub fn connect(&self) {
        self.connect_to(self.config.endpoint.clone());
    }

    /// Request a connection to `endpoint`, overriding the configured
    /// URL. Same contract as [`Self::connect`].
    pub fn connect_to(&self, endpoint: impl Into<String>) {
        let endpoint = endpoint.into();
        let mut session = self.session.lock();

        if let Some(active) = session.as_ref()
            && !active.is_cancelled()
        {
            tracing::debug!("connect requested while a session is active; ignoring");
            return;
        }

        let cancel = CancellationToken::new();
        *session = Some(cancel.clone());

        let task = ConnectionTask {
            endpoint,
            reconnect: self.config.reconnect.clone(),
            codec: JsonCodec::new(),
            hub: Arc::clone(&self.hub),
            state_tx: self.state_tx.clone(),
            cancel,
        };
        tokio::spawn(task.run());
    }

    /// Close the push channel and suppress reconnection.
    ///
    /// Cancels the live transport and any scheduled retry; no further
    /// connection attempt happens until `connect` is called again.
    /// Never blocks.
    pub fn disconnect(&self) {
        let Some(cancel) = self.session.lock().take() else {
            return;
        };

        if !cancel.is_cancelled() {
            set_state(&self.state_tx, ConnectionState::Closing);
            cancel.cancel();
        }
        set_state(&self.state_tx, ConnectionState::Disconnected);
    }

    /// Check whether the transport connection is currently open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state_tx.borrow().is_connected()
    }

    /// Get the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    /// Observe connection state transitions.
    #[must_use]
    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }
}

impl std::fmt::Debug for StreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamClient")
            .field("endpoint", &self.config.endpoint)
            .field("state", &self.state())
            .finish()
    }
}

fn set_state(state_tx: &watch::Sender<ConnectionState>, state: ConnectionState) {
    state_tx.send_if_modified(|current| {
        if *current == state {
            false
        } else {
            tracing::debug!(from = %current, to = %state, "connection state change");
            *current = state;
            true
        }
    });
}

/// One connection session: loops attempt → pump frames → back off
/// until cancelled. A manual disconnect cancels the token, which
/// covers the live transport, an in-flight connect, and a pending
/// retry delay alike.
struct ConnectionTask {
    endpoint: String,
    reconnect: ReconnectConfig,
    codec: JsonCodec,
    hub: Arc<NotificationHub>,
    state_tx: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
}

impl ConnectionTask {
    async fn run(self) {
        let mut policy = ReconnectPolicy::new(self.reconnect.clone());

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            self.set_state(ConnectionState::Connecting);
            tracing::info!(endpoint = %self.endpoint, "connecting to push channel");

            let attempt = tokio::select! {
                () = self.cancel.cancelled() => break,
                result = tokio_tungstenite::connect_async(&self.endpoint) => result,
            };

            match attempt {
                Ok((stream, _response)) => {
                    policy.reset();
                    self.set_state(ConnectionState::Connected);
                    tracing::info!("push channel connected");

                    self.read_frames(stream).await;

                    self.set_state(ConnectionState::Disconnected);
                    if self.cancel.is_cancelled() {
                        break;
                    }
                    tracing::warn!("push channel lost");
                }
                Err(e) => {
                    self.set_state(ConnectionState::Disconnected);
                    tracing::warn!(error = %e, "push channel connection failed");
                }
            }

            let Some(delay) = policy.next_delay() else {
                tracing::error!("reconnection attempts exhausted; staying disconnected");
                // Release the session so a later connect starts fresh.
                self.cancel.cancel();
                break;
            };

            tracing::info!(
                attempt = policy.attempt_count(),
                delay_ms = delay.as_millis(),
                "scheduling reconnect"
            );

            tokio::select! {
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep(delay) => {}
            }
        }

        self.set_state(ConnectionState::Disconnected);
        tracing::debug!("connection task finished");
    }

    /// Pump frames from an open transport until it closes, errors, or
    /// the session is cancelled.
    async fn read_frames(
        &self,
        stream: tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
    ) {
        let (mut write, mut read) = stream.split();

        loop {
            let message = tokio::select! {
                () = self.cancel.cancelled() => {
                    let _ = write.send(Message::Close(None)).await;
                    return;
                }
                message = read.next() => message,
            };

            match message {
                Some(Ok(Message::Text(text))) => self.handle_frame(text.as_str()),
                Some(Ok(Message::Ping(data))) => {
                    if write.send(Message::Pong(data)).await.is_err() {
                        return;
                    }
                }
                Some(Ok(Message::Close(_))) => {
                    tracing::info!("server closed the push channel");
                    return;
                }
                Some(Ok(_)) => {
                    // Binary and pong frames are not part of the protocol.
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "push channel transport error");
                    return;
                }
                None => {
                    tracing::info!("push channel stream ended");
                    return;
                }
            }
        }
    }

    /// Decode one frame and fan it out. A malformed frame is logged
    /// and dropped; it neither closes the connection nor changes state.
    fn handle_frame(&self, text: &str) {
        match self.codec.decode(text) {
            Ok(notification) => {
                let delivered = self.hub.publish(&notification);
                tracing::debug!(
                    kind = %notification.kind(),
                    delivered,
                    "notification dispatched"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed frame");
            }
        }
    }

    fn set_state(&self, state: ConnectionState) {
        // Checked inside the closure so the ownership test and the
        // write are atomic under the watch lock: once teardown has
        // cancelled the token, a late write from this session cannot
        // land over the Disconnected state (or a fresh session's).
        self.state_tx.send_if_modified(|current| {
            if self.cancel.is_cancelled() || *current == state {
                return false;
            }
            tracing::debug!(from = %current, to = %state, "connection state change");
            *current = state;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_for(hub: Arc<NotificationHub>) -> ConnectionTask {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        ConnectionTask {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            reconnect: ReconnectConfig::default(),
            codec: JsonCodec::new(),
            hub,
            state_tx,
            cancel: CancellationToken::new(),
        }
    }

    #[test]
    fn default_config_uses_default_endpoint() {
        let config = StreamClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn config_with_custom_endpoint() {
        let config = StreamClientConfig::new("ws://example.invalid/ws");
        assert_eq!(config.endpoint, "ws://example.invalid/ws");
    }

    #[test]
    fn starts_disconnected() {
        let hub = Arc::new(NotificationHub::new());
        let client = StreamClient::new(StreamClientConfig::default(), hub);

        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert!(!client.is_connected());
    }

    #[test]
    fn disconnect_without_connect_is_a_no_op() {
        let hub = Arc::new(NotificationHub::new());
        let client = StreamClient::new(StreamClientConfig::default(), hub);

        client.disconnect();
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn malformed_frame_does_not_change_state_or_publish() {
        let hub = Arc::new(NotificationHub::new());
        let seen = Arc::new(parking_lot::Mutex::new(0u32));
        let seen_inner = Arc::clone(&seen);
        let _handle = hub.subscribe(move |_| *seen_inner.lock() += 1);

        let task = task_for(hub);
        task.handle_frame("not json");
        task.handle_frame(r#"{"nope": true}"#);

        assert_eq!(*seen.lock(), 0);
        assert_eq!(*task.state_tx.borrow(), ConnectionState::Disconnected);
    }

    #[test]
    fn valid_frame_is_published() {
        let hub = Arc::new(NotificationHub::new());
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let seen_inner = Arc::clone(&seen);
        let _handle = hub.subscribe(move |n| seen_inner.lock().push(n.clone()));

        let task = task_for(hub);
        task.handle_frame(r#"{"type":"position_created"}"#);

        assert_eq!(seen.lock().len(), 1);
    }
}
