//! Failures of a single attempt that never produced a response.

use thiserror::Error;

/// Why an attempt came back without an HTTP response.
///
/// The pipeline retries [`Connection`](Self::Connection) and
/// [`Timeout`](Self::Timeout); [`InvalidUrl`](Self::InvalidUrl) is final.
#[derive(Debug, Error)]
pub enum HttpError {
    /// DNS, refused connection, TLS handshake, or a body cut short.
    #[error("connection to provider failed: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// No answer within the per-attempt timeout.
    #[error("provider did not answer before the timeout")]
    Timeout,

    #[error("request URL rejected: {0}")]
    InvalidUrl(String),
}

impl HttpError {
    /// The request may or may not have reached the provider.
    #[must_use]
    pub const fn is_network_failure(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout)
    }
}
