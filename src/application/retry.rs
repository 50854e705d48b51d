use crate::domain::payment::RejectReason;
use rand::Rng;
use std::time::Duration;

/// Bounded retry with exponential backoff for provider submissions.
///
/// Only failures where the request provably never reached the provider are
/// retried (see [`RejectReason::is_retry_safe`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total submissions per invoice, including the first one.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A single attempt per invoice.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn should_retry(&self, attempt: u32, reason: &RejectReason) -> bool {
        attempt < self.max_attempts && reason.is_retry_safe()
    }

    /// Delay before the attempt following `attempt` (1-based).
    ///
    /// Doubles per attempt up to `max_backoff`, plus up to 25% jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let base = self
            .initial_backoff
            .saturating_mul(1 << exponent)
            .min(self.max_backoff);
        let jitter_cap = base.as_millis() as u64 / 4;
        if jitter_cap == 0 {
            return base;
        }
        let jitter = rand::thread_rng().gen_range(0..=jitter_cap);
        base + Duration::from_millis(jitter)
    }
}
