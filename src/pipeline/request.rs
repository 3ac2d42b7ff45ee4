//! Outbound request and provider response value types.

use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Header carrying the idempotency key on mutating requests.
pub const IDEMPOTENCY_KEY_HEADER: &str = "x-idempotency-key";

/// One logical call to the provider, before it is dispatched.
///
/// The request is built once and re-dispatched unchanged on every retry,
/// so the idempotency key it carries is identical across attempts.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the provider base URL, e.g. `/v1/payments`
    pub path: String,
    /// Query string pairs, in order
    pub query: Vec<(String, String)>,
    /// Extra headers for this call
    pub headers: HeaderMap,
    /// JSON body bytes
    pub body: Option<Vec<u8>>,
    /// Idempotency key; assigned by the pipeline for mutating methods if absent
    pub idempotency_key: Option<String>,
}

impl OutboundRequest {
    /// Creates a request with no query, body, headers or key.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            idempotency_key: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a query pair.
    #[must_use]
    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Appends a query pair only when `value` is present.
    #[must_use]
    pub fn with_optional_query(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.with_query(key, value),
            None => self,
        }
    }

    /// Serializes `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be serialized.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Sets an extra header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Uses a caller-chosen idempotency key instead of a generated one.
    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Returns true for methods that change provider state (POST, PUT, PATCH).
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }

    /// Assigns a fresh random key to a mutating request that has none.
    ///
    /// Keys already present are kept as they are.
    #[must_use]
    pub fn with_assigned_idempotency_key(mut self) -> Self {
        if self.is_mutating() && self.idempotency_key.is_none() {
            self.idempotency_key = Some(uuid::Uuid::new_v4().to_string());
        }
        self
    }
}

/// Successful (2xx) response returned by the pipeline.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: Vec<u8>,
    /// Number of dispatch attempts it took, including the successful one
    pub attempts: u32,
}

impl ProviderResponse {
    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
