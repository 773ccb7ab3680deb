//! Retry policy for provider calls.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exponential backoff between attempts at the same model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(300),
            max_delay: Duration::from_millis(900),
            multiplier: 1.5,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.max(0.0).powi(attempt.saturating_sub(1) as i32);
        let delay_ms = (self.initial_delay.as_millis() as f64 * factor).round();
        let cap_ms = self.max_delay.as_millis() as f64;
        Duration::from_millis(delay_ms.min(cap_ms) as u64)
    }

    /// Attempts actually made, never less than one
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}
