#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access
    )
)]

//! Tradedash Stream Client - Live Update Channel
//!
//! Keeps the trading-records dashboard live-updated: one persistent
//! WebSocket connection to the backend's push channel, automatic
//! reconnection with bounded exponential backoff, and synchronous
//! fan-out of typed change notifications to per-view consumers.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Core types
//!   - `connection`: Connection lifecycle state
//!   - `notification`: Typed change notifications
//!   - `records`: Dashboard record shapes (payload boundary)
//!
//! - **Application**: View-facing use cases
//!   - `views`: Interest sets and refresh triggers
//!
//! - **Infrastructure**: Adapters
//!   - `ws`: Push-channel client, codec, reconnection policy
//!   - `hub`: Notification multicast registry
//!   - `config`: Environment-variable configuration
//!   - `telemetry`: Tracing setup
//!
//! # Data Flow
//!
//! ```text
//! Backend WS ──► StreamClient ──► JsonCodec ──► NotificationHub ──► view A
//!     ▲               │                                        ├──► view B
//!     └── backoff ────┘                                        └──► view N
//! ```
//!
//! Delivery is best-effort: notifications missed while disconnected
//! are lost, and each view simply re-pulls its own data on the next
//! relevant notification.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core types with no external service dependencies.
pub mod domain;

/// Application layer - View-facing use cases.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::connection::ConnectionState;
pub use domain::notification::{Notification, NotificationKind};
pub use domain::records::{MonthlyIncome, Position, Withdrawal};

// Application helpers
pub use application::views::{View, subscribe_view};

// Infrastructure
pub use infrastructure::config::{ConfigError, DashboardConfig, StreamSettings};
pub use infrastructure::hub::{NotificationHub, SubscriptionHandle};
pub use infrastructure::ws::{
    CodecError, DEFAULT_ENDPOINT, JsonCodec, ReconnectConfig, ReconnectPolicy, StreamClient,
    StreamClientConfig,
};
