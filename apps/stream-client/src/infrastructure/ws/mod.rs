//! WebSocket Push Channel
//!
//! Connection management for the dashboard's live-update channel:
//! the stream client, frame codec, and reconnection policy.

/// Connection manager for the push channel.
pub mod client;

/// JSON frame codec.
pub mod codec;

/// Exponential backoff reconnection policy.
pub mod reconnect;

pub use client::{DEFAULT_ENDPOINT, StreamClient, StreamClientConfig};
pub use codec::{CodecError, JsonCodec};
pub use reconnect::{ReconnectConfig, ReconnectPolicy};
