//! Explicit retry combinator
//!
//! Used in exactly two places: around a full pass over the IP lookup
//! endpoints, and by the driver around a whole reconciliation cycle.
//! Nothing else in the core retries; the next cycle is the retry mechanism
//! for every other failure.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Delay schedule between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay after every failed attempt
    Fixed(Duration),
    /// `base` after the first failure, doubling after each further one
    Exponential {
        /// Delay after the first failed attempt
        base: Duration,
    },
}

/// Attempt budget plus backoff schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first (at least 1)
    pub max_attempts: usize,
    /// Delay schedule between attempts
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Create a policy; a zero attempt budget is raised to one
    pub fn new(max_attempts: usize, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Single attempt, no retry
    pub fn once() -> Self {
        Self::new(1, Backoff::Fixed(Duration::ZERO))
    }

    /// Delay to wait after the given (1-based) failed attempt
    pub fn delay_after(&self, attempt: usize) -> Duration {
        match self.backoff {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base } => {
                let exponent = attempt.saturating_sub(1).min(31) as u32;
                base.saturating_mul(1u32 << exponent)
            }
        }
    }
}

/// Run `operation` until it succeeds or the policy's budget is spent
///
/// Sleeps between attempts according to the policy. Returns the first
/// success, or the error of the final attempt.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, label: &str, mut operation: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= policy.max_attempts => return Err(e),
            Err(e) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "{} attempt {}/{} failed: {}; retrying in {:?}",
                    label, attempt, policy.max_attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
