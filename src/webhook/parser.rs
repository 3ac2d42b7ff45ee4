//! Entry point for inbound deliveries.

use std::fmt;

use crate::time::{Clock, SystemClock};

use super::{SignatureError, WebhookError, WebhookEvent, decode_event, verify};

/// Authenticates and decodes webhook deliveries.
///
/// With a secret configured, every delivery through [`parse`] must carry a
/// valid signature. Without one, verification is skipped. The parser holds
/// no mutable state and can be shared freely across threads.
///
/// [`parse`]: WebhookParser::parse
pub struct WebhookParser<C = SystemClock> {
    secret: Option<String>,
    clock: C,
}

impl WebhookParser<SystemClock> {
    /// Creates a parser. An empty secret counts as no secret.
    #[must_use]
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            clock: SystemClock,
        }
    }
}

impl<C> WebhookParser<C> {
    /// Sets the clock used for the `created_at` fallback.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> WebhookParser<C2> {
        WebhookParser {
            secret: self.secret,
            clock,
        }
    }

    /// Returns true if deliveries will be signature-checked.
    #[must_use]
    pub const fn verifies_signatures(&self) -> bool {
        self.secret.is_some()
    }
}

impl<C: Clock> WebhookParser<C> {
    /// Verifies (when a secret is configured) and decodes a delivery.
    ///
    /// A missing request id is treated as empty when building the manifest.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::Signature`] if a secret is configured and the
    ///   signature header is missing, malformed or does not match
    /// - [`WebhookError::Parse`] if the body cannot be decoded
    pub fn parse(
        &self,
        raw_body: &[u8],
        signature: Option<&str>,
        request_id: Option<&str>,
    ) -> Result<WebhookEvent, WebhookError> {
        match &self.secret {
            Some(secret) => {
                let header = signature.ok_or(SignatureError::MissingHeader)?;
                verify(raw_body, header, request_id.unwrap_or_default(), secret).inspect_err(
                    |e| tracing::warn!(request_id, "Rejected webhook delivery: {e}"),
                )?;
            }
            None => tracing::debug!("No webhook secret configured, skipping signature check"),
        }

        self.decode(raw_body)
    }

    /// Decodes a delivery without checking its signature.
    ///
    /// For local development only. Production handlers must use
    /// [`parse`](Self::parse); every call here is logged as a warning.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Parse`] if the body cannot be decoded.
    pub fn parse_unverified(&self, raw_body: &[u8]) -> Result<WebhookEvent, WebhookError> {
        tracing::warn!(
            secret_configured = self.secret.is_some(),
            "Webhook signature verification SKIPPED; do not use in production"
        );
        self.decode(raw_body)
    }

    fn decode(&self, raw_body: &[u8]) -> Result<WebhookEvent, WebhookError> {
        Ok(decode_event(raw_body, self.clock.now())?)
    }
}

impl<C> fmt::Debug for WebhookParser<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookParser")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}
