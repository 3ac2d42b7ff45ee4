//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Production API endpoint.
pub const BASE_URL: &str = "https://api.mercadopago.com";

/// Default per-request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 10;

/// Default number of retries after the first attempt.
pub const RETRY_MAX_RETRIES: u32 = 2;

/// Default retry delay unit in milliseconds.
pub const RETRY_BASE_DELAY_MS: u64 = 300;

/// Default per-request timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}

/// Default retry delay unit as Duration.
#[must_use]
pub const fn retry_base_delay() -> Duration {
    Duration::from_millis(RETRY_BASE_DELAY_MS)
}
