//! Retry policy for outbound provider calls.

use std::time::Duration;

/// Configuration for linear backoff retry behavior.
///
/// A failed attempt is retried only when it is transient (see
/// [`Failure::is_retriable`](super::Failure::is_retriable)) and the retry
/// budget is not spent. The delay before retry *n* is `base_delay * n`.
///
/// # Defaults
///
/// - `max_retries`: 2 (three attempts in total)
/// - `base_delay`: 300 milliseconds
///
/// # Example
///
/// ```
/// use mercadopago::pipeline::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .with_max_retries(3)
///     .with_base_delay(Duration::from_millis(100));
///
/// assert_eq!(policy.delay_for_retry(2), Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of additional attempts after the first one.
    ///
    /// A value of 0 disables retries.
    pub max_retries: u32,

    /// Delay unit; retry *n* waits `base_delay * n`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Default maximum retries.
    pub const DEFAULT_MAX_RETRIES: u32 = 2;

    /// Default base delay (300 milliseconds).
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(300);

    /// Creates a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            base_delay: Self::DEFAULT_BASE_DELAY,
        }
    }

    /// Creates a policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self::new().with_max_retries(0)
    }

    /// Sets the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base delay.
    ///
    /// Zero delay is supported (useful for testing) but creates a tight
    /// retry loop in production.
    #[must_use]
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Total number of attempts this policy allows, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Computes the delay before the given retry (1 = first retry).
    ///
    /// Growth is linear: `base_delay * retry`. Retry 0 has no delay.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry)
    }

    /// Decides whether another attempt should be made.
    ///
    /// # Arguments
    ///
    /// * `retries_done` - Retries already performed for this logical request
    /// * `retriable` - Whether the latest failure is transient
    #[must_use]
    pub const fn should_retry(&self, retries_done: u32, retriable: bool) -> bool {
        retriable && retries_done < self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
