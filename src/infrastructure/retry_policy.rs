//! Retry policy for page fetches
//!
//! Failures are classified first; non-recoverable ones stop immediately,
//! the rest back off exponentially with jitter up to a cap.

use std::time::Duration;

use super::config::HttpConfig;
use super::fetch_error::FetchError;

/// Minimum wait after the server answered 429
const RATE_LIMIT_FLOOR: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Server errors, timeouts, dropped connections, suspicious bodies
    Recoverable,
    /// The page is gone or forbidden; retrying cannot help
    NonRecoverable,
    /// HTTP 429
    RateLimited,
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_backoff: Duration,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&HttpConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff,
            max_backoff: max_backoff.max(base_backoff),
        }
    }

    pub fn from_config(config: &HttpConfig) -> Self {
        Self::new(
            config.retry_attempts,
            Duration::from_millis(config.backoff_base_ms),
            Duration::from_millis(config.backoff_max_ms),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn classify(error: &FetchError) -> FailureClass {
        match error {
            FetchError::HttpStatus { status: 429, .. } => FailureClass::RateLimited,
            FetchError::HttpStatus { status, .. } if *status >= 500 || *status == 408 => FailureClass::Recoverable,
            FetchError::HttpStatus { .. } | FetchError::RetriesExhausted { .. } => FailureClass::NonRecoverable,
            FetchError::Transport { .. } | FetchError::ContentRejected { .. } => FailureClass::Recoverable,
        }
    }

    /// `attempt` is the number of attempts already made.
    pub fn should_retry(&self, class: FailureClass, attempt: u32) -> bool {
        class != FailureClass::NonRecoverable && attempt < self.max_attempts
    }

    /// Delay before the attempt following `attempt`: base * 2^(attempt-1) plus up to 25% jitter, capped.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let base_ms = u64::try_from(self.base_backoff.as_millis()).unwrap_or(u64::MAX);
        let exponential = base_ms.saturating_mul(1_u64 << exponent);
        let jitter = fastrand::u64(0..=exponential / 4);
        let cap = u64::try_from(self.max_backoff.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(exponential.saturating_add(jitter).min(cap))
    }

    pub fn delay_for(&self, class: FailureClass, attempt: u32) -> Duration {
        let backoff = self.backoff(attempt);
        match class {
            FailureClass::RateLimited => backoff.max(RATE_LIMIT_FLOOR),
            _ => backoff,
        }
    }
}
