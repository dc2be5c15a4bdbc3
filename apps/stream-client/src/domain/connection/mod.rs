//! Connection State
//!
//! Lifecycle state of the push-channel connection. Owned exclusively by
//! the stream client; everyone else observes it through a watch channel.

/// State of the push-channel connection.
///
/// Transitions:
///
/// ```text
/// Disconnected --connect()--> Connecting --open--> Connected
///       ^                         |                    |
///       |                 error / close        close / error
///       +-------------------------+--------------------+
///
/// Connecting | Connected --disconnect()--> Closing --> Disconnected
/// ```
///
/// A non-manual close schedules a reconnection attempt after the
/// current backoff delay; a manual close suppresses reconnection until
/// `connect` is called again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No transport connection and no attempt in flight.
    #[default]
    Disconnected,
    /// A transport connection attempt is in flight.
    Connecting,
    /// The transport connection is open.
    Connected,
    /// A manual close is in progress.
    Closing,
}

impl ConnectionState {
    /// Check whether the connection is open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Get the state name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Closing => "closing",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
