//! Domain layer - Core types with no external service dependencies.

/// Connection lifecycle state for the push channel.
pub mod connection;

/// Parsed server-pushed change notifications.
pub mod notification;

/// Dashboard record shapes embedded in notification payloads.
pub mod records;
