//! Stream Client Settings
//!
//! Configuration types for the live-update client, loaded from
//! `DASHBOARD_*` environment variables with sensible defaults.

use std::time::Duration;

use crate::infrastructure::ws::client::{DEFAULT_ENDPOINT, StreamClientConfig};
use crate::infrastructure::ws::reconnect::ReconnectConfig;

/// Push-channel connection settings.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Push-channel endpoint URL.
    pub endpoint: String,
    /// Base reconnection delay.
    pub reconnect_delay_base: Duration,
    /// Maximum reconnection delay.
    pub reconnect_delay_max: Duration,
    /// Reconnection delay multiplier for exponential backoff.
    pub reconnect_delay_multiplier: f64,
    /// Jitter factor applied to reconnect delays (0.0 disables).
    pub reconnect_jitter_factor: f64,
    /// Maximum reconnection attempts before giving up (0 = unlimited).
    pub max_reconnect_attempts: u32,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            reconnect_delay_base: Duration::from_secs(3),
            reconnect_delay_max: Duration::from_secs(30),
            reconnect_delay_multiplier: 2.0,
            reconnect_jitter_factor: 0.0,
            max_reconnect_attempts: 0, // Retry forever
        }
    }
}

impl From<&StreamSettings> for StreamClientConfig {
    fn from(settings: &StreamSettings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            reconnect: ReconnectConfig {
                base_delay: settings.reconnect_delay_base,
                max_delay: settings.reconnect_delay_max,
                multiplier: settings.reconnect_delay_multiplier,
                jitter_factor: settings.reconnect_jitter_factor,
                max_attempts: settings.max_reconnect_attempts,
            },
        }
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, Default)]
pub struct DashboardConfig {
    /// Push-channel settings.
    pub stream: StreamSettings,
}

impl DashboardConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable has an empty value. Unset
    /// variables fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = StreamSettings::default();

        let endpoint = match std::env::var("DASHBOARD_WS_URL") {
            Ok(value) if value.is_empty() => {
                return Err(ConfigError::EmptyValue("DASHBOARD_WS_URL".to_string()));
            }
            Ok(value) => value,
            Err(_) => defaults.endpoint,
        };

        let stream = StreamSettings {
            endpoint,
            reconnect_delay_base: parse_env_duration_millis(
                "DASHBOARD_RECONNECT_DELAY_BASE_MS",
                defaults.reconnect_delay_base,
            ),
            reconnect_delay_max: parse_env_duration_millis(
                "DASHBOARD_RECONNECT_DELAY_MAX_MS",
                defaults.reconnect_delay_max,
            ),
            reconnect_delay_multiplier: parse_env_f64(
                "DASHBOARD_RECONNECT_DELAY_MULTIPLIER",
                defaults.reconnect_delay_multiplier,
            ),
            reconnect_jitter_factor: parse_env_f64(
                "DASHBOARD_RECONNECT_JITTER_FACTOR",
                defaults.reconnect_jitter_factor,
            ),
            max_reconnect_attempts: parse_env_u32(
                "DASHBOARD_MAX_RECONNECT_ATTEMPTS",
                defaults.max_reconnect_attempts,
            ),
        };

        Ok(Self { stream })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

fn parse_env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_duration_millis(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_settings_defaults() {
        let settings = StreamSettings::default();
        assert_eq!(settings.endpoint, "ws://localhost:8080/ws");
        assert_eq!(settings.reconnect_delay_base, Duration::from_secs(3));
        assert_eq!(settings.reconnect_delay_max, Duration::from_secs(30));
        assert!((settings.reconnect_delay_multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(settings.max_reconnect_attempts, 0);
    }

    #[test]
    fn settings_convert_to_client_config() {
        let settings = StreamSettings {
            endpoint: "ws://example.invalid/ws".to_string(),
            reconnect_delay_base: Duration::from_millis(250),
            ..StreamSettings::default()
        };

        let config = StreamClientConfig::from(&settings);
        assert_eq!(config.endpoint, "ws://example.invalid/ws");
        assert_eq!(config.reconnect.base_delay, Duration::from_millis(250));
        assert_eq!(config.reconnect.max_delay, Duration::from_secs(30));
    }

    #[test]
    fn parse_helpers_fall_back_on_garbage() {
        // Env vars unset in the test environment.
        assert_eq!(parse_env_u32("DASHBOARD_TEST_UNSET_U32", 5), 5);
        assert_eq!(
            parse_env_duration_millis("DASHBOARD_TEST_UNSET_MS", Duration::from_secs(1)),
            Duration::from_secs(1)
        );
    }
}
