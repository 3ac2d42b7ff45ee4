//! Shared test doubles for the transport and time abstractions.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::pipeline::RequestPipeline;
use crate::time::{InstantSleeper, Sleeper};
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Mock HTTP client that replays a scripted sequence of outcomes.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    outcomes: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl ScriptedClient {
    pub fn new(outcomes: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Client answering a single request with `status` and a JSON body.
    pub fn json(status: u16, body: &str) -> Self {
        Self::new(vec![json_response(status, body)])
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.captured_requests()
            .pop()
            .expect("at least one request was sent")
    }

    pub fn last_body(&self) -> serde_json::Value {
        let body = self.last_request().body.expect("request has a body");
        serde_json::from_slice(&body).unwrap()
    }
}

impl HttpClient for ScriptedClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted outcome left")
    }
}

/// Response with the given status and JSON body.
pub fn json_response(status: u16, body: &str) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    ))
}

/// Response with the given status and an empty body.
pub fn status(status: u16) -> Result<HttpResponse, HttpError> {
    json_response(status, "")
}

pub fn timeout() -> Result<HttpResponse, HttpError> {
    Err(HttpError::Timeout)
}

pub fn connection_refused() -> Result<HttpResponse, HttpError> {
    Err(HttpError::Connection(Box::new(std::io::Error::other(
        "connection refused",
    ))))
}

/// Sleeper that returns immediately and records every requested delay.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for &RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

pub const TEST_TOKEN: &str = "APP-USR-1234567890";

/// Pipeline against a fake base URL that shares `client` with the test.
pub fn pipeline(client: &Arc<ScriptedClient>) -> RequestPipeline<Arc<ScriptedClient>, InstantSleeper> {
    let base_url = url::Url::parse("https://api.mercadopago.com").unwrap();
    RequestPipeline::new(Arc::clone(client), base_url, TEST_TOKEN)
        .unwrap()
        .with_sleeper(InstantSleeper)
}

/// Decoded query pairs of a captured request.
pub fn query_pairs(request: &HttpRequest) -> Vec<(String, String)> {
    request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
