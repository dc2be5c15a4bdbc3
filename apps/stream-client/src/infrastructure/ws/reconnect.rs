//! Reconnection Policy
//!
//! Bounded exponential backoff for the push-channel connection. The
//! delay starts at the configured base, is multiplied (capped at the
//! maximum) after every failed connect-then-close cycle, and is reset
//! to the base whenever a connection is established.

use std::time::Duration;

use rand::Rng;

/// Configuration for reconnection behavior.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Base delay before the first reconnection attempt.
    pub base_delay: Duration,
    /// Maximum delay between reconnection attempts.
    pub max_delay: Duration,
    /// Multiplier applied after each failed cycle (2.0 doubles).
    pub multiplier: f64,
    /// Jitter factor as a fraction (0.1 = ±10% randomization).
    ///
    /// Zero by default: the dashboard runs a single connection per
    /// session, so thundering-herd smearing is opt-in.
    pub jitter_factor: f64,
    /// Maximum number of reconnection attempts (0 = unlimited).
    pub max_attempts: u32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(3),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter_factor: 0.0,
            max_attempts: 0, // Unlimited
        }
    }
}

/// Reconnection policy implementing bounded exponential backoff.
///
/// # Example
///
/// ```rust
/// use tradedash_stream_client::infrastructure::ws::reconnect::{
///     ReconnectConfig, ReconnectPolicy,
/// };
///
/// let mut policy = ReconnectPolicy::new(ReconnectConfig::default());
///
/// // Delay for the first attempt
/// let delay = policy.next_delay();
/// assert!(delay.is_some());
///
/// // Connection established, start over from the base delay
/// policy.reset();
/// ```
#[derive(Debug)]
pub struct ReconnectPolicy {
    config: ReconnectConfig,
    current_delay: Duration,
    attempt_count: u32,
}

impl ReconnectPolicy {
    /// Create a new reconnection policy.
    #[must_use]
    pub const fn new(config: ReconnectConfig) -> Self {
        let current_delay = config.base_delay;
        Self {
            config,
            current_delay,
            attempt_count: 0,
        }
    }

    /// Get the delay to wait before the next attempt, then advance the
    /// backoff.
    ///
    /// Returns `None` once the attempt cap is exhausted.
    #[must_use]
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.config.max_attempts > 0 && self.attempt_count >= self.config.max_attempts {
            return None;
        }

        self.attempt_count += 1;
        let delay = self.apply_jitter(self.current_delay);
        self.current_delay = self.grow(self.current_delay);

        Some(delay)
    }

    /// Reset the policy after a successful connection.
    pub const fn reset(&mut self) {
        self.current_delay = self.config.base_delay;
        self.attempt_count = 0;
    }

    /// Get the delay the next attempt would wait, without advancing.
    #[must_use]
    pub const fn current_delay(&self) -> Duration {
        self.current_delay
    }

    /// Get the number of attempts made since the last reset.
    #[must_use]
    pub const fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Check if another attempt is allowed.
    #[must_use]
    pub const fn should_retry(&self) -> bool {
        self.config.max_attempts == 0 || self.attempt_count < self.config.max_attempts
    }

    /// Multiply a delay by the configured factor, capped at the maximum.
    fn grow(&self, delay: Duration) -> Duration {
        #[allow(clippy::cast_precision_loss)]
        let scaled = (delay.as_millis() as f64 * self.config.multiplier).round();
        let next_millis = if scaled.is_finite() && scaled > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                scaled as u128
            }
        } else {
            0
        };
        let capped = next_millis.min(self.config.max_delay.as_millis());
        Duration::from_millis(u64::try_from(capped).unwrap_or(u64::MAX))
    }

    /// Apply jitter to a duration.
    fn apply_jitter(&self, duration: Duration) -> Duration {
        if self.config.jitter_factor <= 0.0 {
            return duration;
        }

        #[allow(clippy::cast_precision_loss)]
        let base_millis = duration.as_millis() as f64;
        let jitter_range = base_millis * self.config.jitter_factor;
        let mut rng = rand::rng();
        let jitter: f64 = rng.random_range(-jitter_range..=jitter_range);
        let adjusted_millis = (base_millis + jitter).max(1.0);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Duration::from_millis(adjusted_millis as u64)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn deterministic(base_ms: u64, max_ms: u64) -> ReconnectConfig {
        ReconnectConfig {
            base_delay: Duration::from_millis(base_ms),
            max_delay: Duration::from_millis(max_ms),
            multiplier: 2.0,
            jitter_factor: 0.0,
            max_attempts: 0,
        }
    }

    #[test]
    fn default_config_values() {
        let config = ReconnectConfig::default();
        assert_eq!(config.base_delay, Duration::from_secs(3));
        assert_eq!(config.max_delay, Duration::from_secs(30));
        assert!((config.multiplier - 2.0).abs() < f64::EPSILON);
        assert!(config.jitter_factor.abs() < f64::EPSILON);
        assert_eq!(config.max_attempts, 0);
    }

    #[test]
    fn delays_double_per_failed_cycle() {
        let mut policy = ReconnectPolicy::new(deterministic(100, 10_000));

        assert_eq!(policy.next_delay(), Some(Duration::from_millis(100)));
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(200)));
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(400)));
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(800)));
    }

    #[test]
    fn delay_is_capped_at_max() {
        let mut policy = ReconnectPolicy::new(ReconnectConfig {
            multiplier: 4.0,
            ..deterministic(1_000, 2_000)
        });

        let _ = policy.next_delay();
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(2_000)));
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(2_000)));
    }

    #[test]
    fn reset_returns_to_base_regardless_of_failures() {
        let mut policy = ReconnectPolicy::new(deterministic(100, 10_000));

        for _ in 0..6 {
            let _ = policy.next_delay();
        }
        policy.reset();

        assert_eq!(policy.attempt_count(), 0);
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn attempt_cap_is_honored() {
        let mut policy = ReconnectPolicy::new(ReconnectConfig {
            max_attempts: 2,
            ..deterministic(100, 1_000)
        });

        assert!(policy.next_delay().is_some());
        assert!(policy.next_delay().is_some());
        assert!(policy.next_delay().is_none());
        assert!(!policy.should_retry());
    }

    #[test]
    fn unlimited_attempts_by_default() {
        let mut policy = ReconnectPolicy::new(deterministic(1, 10));
        for _ in 0..1_000 {
            assert!(policy.should_retry());
            assert!(policy.next_delay().is_some());
        }
    }

    #[test]
    fn jitter_stays_within_bounds() {
        for _ in 0..100 {
            let mut policy = ReconnectPolicy::new(ReconnectConfig {
                jitter_factor: 0.1,
                ..deterministic(1_000, 10_000)
            });

            let millis = policy.next_delay().unwrap().as_millis();
            assert!((900..=1_100).contains(&millis), "delay {millis}ms out of bounds");
        }
    }

    proptest! {
        // After N failures without success the pending delay equals
        // min(base * 2^N, max).
        #[test]
        fn nth_delay_matches_closed_form(
            base_ms in 1u64..1_000,
            max_factor in 1u32..10,
            failures in 0u32..16,
        ) {
            let max_ms = base_ms * u64::from(max_factor);
            let mut policy = ReconnectPolicy::new(deterministic(base_ms, max_ms));

            for _ in 0..failures {
                let _ = policy.next_delay();
            }

            let expected = base_ms
                .checked_mul(1u64 << failures.min(63))
                .map_or(max_ms, |d| d.min(max_ms));
            prop_assert_eq!(
                policy.current_delay(),
                Duration::from_millis(expected)
            );
        }
    }
}
