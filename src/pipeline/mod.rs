//! Resilient outbound request pipeline.
//!
//! Every call to the provider goes through [`RequestPipeline::send`], which:
//! - attaches an idempotency key to mutating requests ([`OutboundRequest`])
//! - retries transient failures with linear backoff ([`RetryPolicy`])
//! - turns the terminal outcome into a [`ProviderError`] ([`normalize`])

mod error;
mod request;
mod retry;
mod sender;

#[cfg(test)]
mod error_tests;
#[cfg(test)]
mod retry_tests;

pub use error::{Failure, ProviderError, normalize};
pub use request::{IDEMPOTENCY_KEY_HEADER, OutboundRequest, ProviderResponse};
pub use retry::RetryPolicy;
pub use sender::RequestPipeline;
