//! Top-level error type for client operations.

use thiserror::Error;

use crate::pipeline::ProviderError;
use crate::transport::HttpError;
use crate::validation::ValidationError;
use crate::webhook::WebhookError;

/// Error returned by [`MercadoPago`](crate::MercadoPago) operations.
///
/// Each kind is distinguishable so callers can, for example, answer a
/// forged webhook with 401 while surfacing a declined payment as a 4xx.
#[derive(Debug, Error)]
pub enum Error {
    /// Input was rejected before any request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The provider call failed (4xx, or retries exhausted).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A webhook delivery failed authentication or decoding.
    #[error(transparent)]
    Webhook(#[from] WebhookError),

    /// A request body could not be encoded or a response body decoded.
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Transport(#[from] HttpError),
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the provider status code, if this is a provider error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Provider(e) => Some(e.status),
            _ => None,
        }
    }
}
