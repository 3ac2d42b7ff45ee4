//! [`HttpClient`] backed by `reqwest`.

use std::time::Duration;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// The transport used by [`MercadoPago::new`](crate::MercadoPago::new).
///
/// Each attempt is bounded by the timeout given at construction; running
/// past it yields [`HttpError::Timeout`], which the pipeline retries.
///
/// ```no_run
/// use std::time::Duration;
/// use mercadopago::transport::{HttpClient, HttpRequest, ReqwestClient};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::with_timeout(Duration::from_secs(10))?;
/// let url = url::Url::parse("https://api.mercadopago.com/v1/payment_methods")?;
/// let response = client.request(HttpRequest::get(url)).await?;
/// assert!(response.status.as_u16() > 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// No timeout; prefer [`ReqwestClient::with_timeout`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// [`HttpError::Connection`] when the TLS backend fails to initialize.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map(Self::from_client)
            .map_err(|e| HttpError::Connection(Box::new(e)))
    }

    /// Wraps a client built elsewhere, e.g. with a proxy or custom roots.
    #[must_use]
    pub const fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = req;

        let mut outgoing = self.inner.request(method, url).headers(headers);
        if let Some(bytes) = body {
            outgoing = outgoing.body(bytes);
        }

        let response = outgoing.send().await.map_err(into_http_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(into_http_error)?;

        Ok(HttpResponse::new(status, headers, body.to_vec()))
    }
}

fn into_http_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidUrl(e.to_string())
    } else {
        HttpError::Connection(Box::new(e))
    }
}
