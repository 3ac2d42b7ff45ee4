//! The request pipeline: dispatch, classify, back off, re-dispatch.

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, InvalidHeaderValue};
use http::{HeaderName, HeaderValue};

use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpClient, HttpError, HttpRequest};

use super::{
    Failure, IDEMPOTENCY_KEY_HEADER, OutboundRequest, ProviderError, ProviderResponse,
    RetryPolicy, normalize,
};

/// Orchestrates every outbound call to the provider.
///
/// The pipeline is immutable once built: configuration is fixed at
/// construction and retry state lives only inside a single [`send`] call, so
/// one pipeline can serve any number of concurrent requests.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper implementation for retry delays (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```
/// use mercadopago::pipeline::{OutboundRequest, RequestPipeline, RetryPolicy};
/// use mercadopago::transport::ReqwestClient;
/// use url::Url;
///
/// let pipeline = RequestPipeline::new(
///     ReqwestClient::new(),
///     Url::parse("https://api.mercadopago.com").unwrap(),
///     "APP-USR-123",
/// )
/// .unwrap()
/// .with_retry_policy(RetryPolicy::new().with_max_retries(3));
/// ```
///
/// [`send`]: RequestPipeline::send
#[derive(Debug)]
pub struct RequestPipeline<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    base_url: url::Url,
    authorization: HeaderValue,
    retry_policy: RetryPolicy,
}

impl<H> RequestPipeline<H, TokioSleeper> {
    /// Creates a pipeline with the default retry policy and [`TokioSleeper`].
    ///
    /// # Errors
    ///
    /// Returns an error if `token` contains bytes not allowed in a header.
    pub fn new(client: H, base_url: url::Url, token: &str) -> Result<Self, InvalidHeaderValue> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))?;
        authorization.set_sensitive(true);

        Ok(Self {
            client,
            sleeper: TokioSleeper,
            base_url,
            authorization,
            retry_policy: RetryPolicy::default(),
        })
    }
}

impl<H, S> RequestPipeline<H, S> {
    /// Sets a custom sleeper for retry delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RequestPipeline<H, S2> {
        RequestPipeline {
            client: self.client,
            sleeper,
            base_url: self.base_url,
            authorization: self.authorization,
            retry_policy: self.retry_policy,
        }
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the provider base URL.
    #[must_use]
    pub const fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}

impl<H: HttpClient, S: Sleeper> RequestPipeline<H, S> {
    /// Sends one logical request, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the provider answers with a non-2xx,
    /// non-retriable status, when the retry budget is exhausted, or when the
    /// request cannot be built.
    pub async fn send(&self, request: OutboundRequest) -> Result<ProviderResponse, ProviderError> {
        let request = request.with_assigned_idempotency_key();
        let http_request = self.build_http_request(&request)?;

        let mut retries = 0;
        loop {
            let attempt = retries + 1;
            tracing::debug!(
                method = %request.method,
                path = %request.path,
                attempt,
                "Dispatching provider request"
            );

            let failure = match self.client.request(http_request.clone()).await {
                Ok(response) if response.is_success() => {
                    return Ok(ProviderResponse {
                        status: response.status,
                        headers: response.headers,
                        body: response.body,
                        attempts: attempt,
                    });
                }
                Ok(response) => Failure::Status(response),
                Err(e) => Failure::Transport(e),
            };

            if self
                .retry_policy
                .should_retry(retries, failure.is_retriable())
            {
                retries += 1;
                let delay = self.retry_policy.delay_for_retry(retries);
                tracing::warn!(
                    method = %request.method,
                    path = %request.path,
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Transient provider failure, retrying: {}",
                    describe(&failure)
                );
                self.sleeper.sleep(delay).await;
                continue;
            }

            let error = normalize(&failure);
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                status = error.status,
                attempts = attempt,
                "Provider request failed: {}",
                error.message
            );
            return Err(error);
        }
    }

    /// Resolves the URL and attaches the fixed headers once per logical request.
    fn build_http_request(&self, request: &OutboundRequest) -> Result<HttpRequest, ProviderError> {
        let mut url = self
            .base_url
            .join(&request.path)
            .map_err(|e| normalize(&Failure::Transport(HttpError::InvalidUrl(e.to_string()))))?;

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        let mut http_request = HttpRequest::new(request.method.clone(), url)
            .with_header(AUTHORIZATION, self.authorization.clone())
            .with_header(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in &request.headers {
            http_request.headers.insert(name, value.clone());
        }

        if let Some(body) = &request.body {
            http_request = http_request
                .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .with_body(body.clone());
        }

        if let Some(key) = &request.idempotency_key {
            let value = HeaderValue::from_str(key).map_err(|e| {
                ProviderError::without_response(format!("Invalid idempotency key: {e}"))
            })?;
            http_request = http_request.with_header(
                HeaderName::from_static(IDEMPOTENCY_KEY_HEADER),
                value,
            );
        }

        Ok(http_request)
    }
}

fn describe(failure: &Failure) -> String {
    match failure {
        Failure::Transport(e) => e.to_string(),
        Failure::Status(response) => format!("status {}", response.status),
    }
}
