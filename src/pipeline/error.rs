//! Failure classification and normalization into [`ProviderError`].

use serde_json::Value;
use thiserror::Error;

use crate::transport::{HttpError, HttpResponse};

/// Error surfaced to callers when a provider call does not succeed.
///
/// Produced for client errors (4xx), for transient failures once the retry
/// budget is exhausted, and for requests that could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("MercadoPago API error {status}: {message}")]
pub struct ProviderError {
    /// HTTP status of the last attempt, or 0 when no response was received.
    pub status: u16,
    /// Human-readable message, resolved from the provider body when possible.
    pub message: String,
    /// Provider response body, kept opaque for diagnostics.
    pub raw: Option<Value>,
}

impl ProviderError {
    /// Creates an error for a failure that happened before any response.
    #[must_use]
    pub fn without_response(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            message: message.into(),
            raw: None,
        }
    }

    /// Returns true if the provider rejected the request (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }
}

/// Terminal or transient outcome of a single dispatch attempt.
#[derive(Debug)]
pub enum Failure {
    /// No response was received.
    Transport(HttpError),
    /// A response was received with a non-2xx status.
    Status(HttpResponse),
}

impl Failure {
    /// Returns true if the failure is transient and may be retried.
    ///
    /// Transient means no response at all (connection failure, timeout) or
    /// a response with status 500 or above.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_network_failure(),
            Self::Status(response) => response.status.as_u16() >= 500,
        }
    }
}

/// Maps a failure outcome into the single error shape surfaced to callers.
///
/// The message is the first non-empty of: body `message`, body `error`,
/// body `cause[0].description`, then the transport error text.
#[must_use]
pub fn normalize(failure: &Failure) -> ProviderError {
    match failure {
        Failure::Transport(e) => ProviderError::without_response(e.to_string()),
        Failure::Status(response) => {
            let status = response.status.as_u16();
            let raw = decode_raw(&response.body);
            let message = raw
                .as_ref()
                .and_then(provider_message)
                .map_or_else(
                    || format!("Request failed with status code {status}"),
                    ToString::to_string,
                );
            ProviderError {
                status,
                message,
                raw,
            }
        }
    }
}

fn provider_message(body: &Value) -> Option<&str> {
    [
        body.get("message"),
        body.get("error"),
        body.pointer("/cause/0/description"),
    ]
    .into_iter()
    .flatten()
    .filter_map(Value::as_str)
    .find(|s| !s.trim().is_empty())
}

fn decode_raw(body: &[u8]) -> Option<Value> {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        return Some(value);
    }
    let text = String::from_utf8_lossy(body);
    if text.trim().is_empty() {
        None
    } else {
        Some(Value::String(text.into_owned()))
    }
}
