//! Retry policy.
//!
//! # Design Decisions
//! - Fixed delay between attempts, no jitter
//! - First attempt is always immediate
//! - Attempt counts below 1 are normalized to a single attempt

use std::time::Duration;

use crate::config::schema::RetryConfig;

/// Bounded retry policy with a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` counts the initial attempt.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether another attempt is allowed after `attempt` failed.
    pub fn has_remaining(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Upper bound on the time spent sleeping between attempts.
    pub fn worst_case_delay(&self) -> Duration {
        self.delay.saturating_mul(self.max_attempts - 1)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_secs(config.delay_secs))
    }
}
