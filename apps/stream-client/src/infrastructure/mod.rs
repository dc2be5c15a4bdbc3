//! Infrastructure layer - Adapters and external integrations.

/// Configuration loading.
pub mod config;

/// Notification fan-out to view consumers.
pub mod hub;

/// Tracing setup.
pub mod telemetry;

/// WebSocket push-channel client.
pub mod ws;
