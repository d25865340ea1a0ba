//! Retry policy for transient dispatch failures.

use std::time::Duration;

use rand::Rng;

use facet_core::config::worker::DispatchConfig;

/// How many times to retry and how long to wait in between.
///
/// `max_retries` counts retries, not attempts: with 3 retries a request is
/// attempted at most 4 times.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_interval: Duration,
    /// Upper bound for any single delay.
    pub max_interval: Duration,
    /// Multiplier applied per retry; 1.0 keeps the delay fixed.
    pub backoff_coefficient: f64,
    /// Fraction (0.0-1.0) of random spread around each delay.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&DispatchConfig::default())
    }
}

impl RetryPolicy {
    /// Build from the `[dispatch]` section.
    pub fn from_config(config: &DispatchConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_interval: Duration::from_secs(config.backoff_seconds),
            max_interval: Duration::from_secs(config.max_backoff_seconds),
            backoff_coefficient: config.backoff_coefficient.max(1.0),
            jitter: config.jitter.clamp(0.0, 1.0),
        }
    }

    /// Fixed delay between retries, no jitter.
    pub fn fixed(interval: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_interval: interval,
            max_interval: interval,
            backoff_coefficient: 1.0,
            jitter: 0.0,
        }
    }

    /// Whether a task that has already been retried `retry_count` times may
    /// be retried again.
    pub fn allows_retry(&self, retry_count: u32) -> bool {
        retry_count < self.max_retries
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let base = self.initial_interval.as_secs_f64() * self.backoff_coefficient.powi(exponent);
        let capped = base.min(self.max_interval.as_secs_f64());

        let jittered = if self.jitter > 0.0 && capped > 0.0 {
            let spread = capped * self.jitter;
            let offset = rand::rng().random_range(-spread..=spread);
            (capped + offset).max(0.0)
        } else {
            capped
        };

        Duration::from_secs_f64(jittered)
    }
}
