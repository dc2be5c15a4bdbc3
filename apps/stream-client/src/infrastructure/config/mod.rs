//! Configuration
//!
//! Settings for the stream client, loaded from environment variables.

mod settings;

pub use settings::{ConfigError, DashboardConfig, StreamSettings};
