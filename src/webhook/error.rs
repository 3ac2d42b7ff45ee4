//! Error types for webhook verification and decoding.

use thiserror::Error;

/// The delivery could not be authenticated.
///
/// Callers should reject the delivery (e.g. respond 401) rather than treat
/// this as a generic failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// A secret is configured but the delivery carried no signature header.
    #[error("Webhook signature header is missing")]
    MissingHeader,

    /// The signature header lacks `ts` or `v1`, or `ts` is not an integer.
    #[error("Malformed webhook signature header: {0}")]
    MalformedHeader(&'static str),

    /// The computed digest does not match `v1`.
    #[error("Webhook signature does not match")]
    Mismatch,
}

/// The delivery body is not a decodable event.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Body bytes are not UTF-8.
    #[error("Webhook body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Body is not JSON, or an object with mistyped fields.
    #[error("Webhook body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Body is valid JSON but an array, scalar or `null`.
    #[error("Webhook body is not a JSON object")]
    NotAnObject,

    /// Neither `topic` nor `type` is present.
    #[error("Webhook body has neither 'topic' nor 'type'")]
    MissingTopic,
}

/// Error type for [`WebhookParser`](super::WebhookParser).
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Authentication failed.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// Decoding failed after authentication passed or was skipped.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl WebhookError {
    /// Returns true if the delivery failed authentication.
    #[must_use]
    pub const fn is_signature(&self) -> bool {
        matches!(self, Self::Signature(_))
    }
}
