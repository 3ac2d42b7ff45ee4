//! The client facade: construction, options and resource accessors.

use std::fmt;
use std::time::Duration;

use tracing::info;

use crate::config::defaults;
use crate::error::Result;
use crate::pipeline::{RequestPipeline, RetryPolicy};
use crate::resources::{Customers, Installments, Orders, Payment, Payments, Subscriptions};
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpClient, ReqwestClient};
use crate::validation::{self, ValidationError};
use crate::webhook::{Topic, WebhookEvent, WebhookParser};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = defaults::BASE_URL;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = defaults::timeout();

/// Settings for [`MercadoPago::new`].
///
/// # Example
///
/// ```
/// use mercadopago::{ClientOptions, MercadoPago};
///
/// let options = ClientOptions::new("APP-USR-123-abc").with_webhook_secret("whsec");
/// let client = MercadoPago::new(options).unwrap();
/// assert!(client.webhooks().verifies_signatures());
/// ```
#[derive(Clone)]
pub struct ClientOptions {
    /// Access token; `APP-USR-...`, or `TEST-...` in sandbox mode
    pub token: String,
    pub webhook_secret: Option<String>,
    pub sandbox: bool,
    pub timeout: Duration,
    pub retry_policy: RetryPolicy,
    pub base_url: String,
}

impl ClientOptions {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            webhook_secret: None,
            sandbox: false,
            timeout: DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    /// Accepts sandbox (`TEST-`) tokens.
    #[must_use]
    pub const fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Points the client at another host, e.g. a local mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("token", &"[redacted]")
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("sandbox", &self.sandbox)
            .field("timeout", &self.timeout)
            .field("retry_policy", &self.retry_policy)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// A MercadoPago API client.
///
/// Cheap to share: all state is fixed at construction, so one client can
/// serve any number of concurrent calls.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation (defaults to [`ReqwestClient`])
/// - `S`: The sleeper used between retries (defaults to [`TokioSleeper`])
#[derive(Debug)]
pub struct MercadoPago<H = ReqwestClient, S = TokioSleeper> {
    pipeline: RequestPipeline<H, S>,
    webhooks: WebhookParser,
    sandbox: bool,
}

impl MercadoPago {
    /// Creates a client backed by `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing or mis-prefixed token or an
    /// unparsable base URL, or a transport error if the HTTP client cannot
    /// be built.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let client = ReqwestClient::with_timeout(options.timeout)?;
        Self::with_transport(options, client, TokioSleeper)
    }
}

impl<H, S> MercadoPago<H, S> {
    /// Creates a client over a caller-provided transport and sleeper.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing or mis-prefixed token or an
    /// unparsable base URL.
    pub fn with_transport(options: ClientOptions, client: H, sleeper: S) -> Result<Self> {
        validation::access_token(&options.token, options.sandbox)?;
        let base_url = url::Url::parse(&options.base_url).map_err(|e| {
            ValidationError::new("base_url", format!("'{}' is not a valid URL: {e}", options.base_url))
        })?;
        let pipeline = RequestPipeline::new(client, base_url, &options.token)
            .map_err(|_| ValidationError::new("token", "contains characters not allowed in a header"))?
            .with_sleeper(sleeper)
            .with_retry_policy(options.retry_policy);

        info!(
            base_url = %pipeline.base_url(),
            sandbox = options.sandbox,
            max_retries = options.retry_policy.max_retries,
            verify_webhooks = options.webhook_secret.as_deref().is_some_and(|s| !s.is_empty()),
            "MercadoPago client ready"
        );

        Ok(Self {
            pipeline,
            webhooks: WebhookParser::new(options.webhook_secret),
            sandbox: options.sandbox,
        })
    }

    #[must_use]
    pub const fn is_sandbox(&self) -> bool {
        self.sandbox
    }

    #[must_use]
    pub const fn pipeline(&self) -> &RequestPipeline<H, S> {
        &self.pipeline
    }

    #[must_use]
    pub const fn payments(&self) -> Payments<'_, H, S> {
        Payments::new(&self.pipeline)
    }

    #[must_use]
    pub const fn customers(&self) -> Customers<'_, H, S> {
        Customers::new(&self.pipeline)
    }

    #[must_use]
    pub const fn subscriptions(&self) -> Subscriptions<'_, H, S> {
        Subscriptions::new(&self.pipeline)
    }

    #[must_use]
    pub const fn orders(&self) -> Orders<'_, H, S> {
        Orders::new(&self.pipeline)
    }

    #[must_use]
    pub const fn installments(&self) -> Installments<'_, H, S> {
        Installments::new(&self.pipeline)
    }

    /// Returns the webhook parser configured with this client's secret.
    #[must_use]
    pub const fn webhooks(&self) -> &WebhookParser {
        &self.webhooks
    }
}

impl<H: HttpClient, S: Sleeper> MercadoPago<H, S> {
    /// Fetches the resource an event refers to.
    ///
    /// Only payment events resolve; other topics yield `None`.
    ///
    /// # Errors
    ///
    /// Returns any error from fetching the payment.
    pub async fn resolve_event(&self, event: &WebhookEvent) -> Result<Option<Payment>> {
        match event.topic {
            Topic::Payment => Ok(Some(self.payments().get(&event.resource_id).await?)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
