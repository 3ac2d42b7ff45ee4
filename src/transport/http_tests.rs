//! Tests for HTTP request/response types.

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

fn api_url(path: &str) -> url::Url {
    url::Url::parse("https://api.mercadopago.com/")
        .unwrap()
        .join(path)
        .unwrap()
}

mod http_request {
    use super::*;

    #[test]
    fn new_creates_request_with_method_and_url() {
        let url = api_url("v1/payments/1");
        let req = HttpRequest::new(http::Method::PUT, url.clone());

        assert_eq!(req.method, http::Method::PUT);
        assert_eq!(req.url, url);
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn get_and_post_set_method() {
        assert_eq!(HttpRequest::get(api_url("a")).method, http::Method::GET);
        assert_eq!(HttpRequest::post(api_url("a")).method, http::Method::POST);
    }

    #[test]
    fn with_body_sets_body() {
        let body = br#"{"status":"cancelled"}"#.to_vec();
        let req = HttpRequest::post(api_url("v1/payments")).with_body(body.clone());

        assert_eq!(req.body, Some(body));
    }

    #[test]
    fn with_header_replaces_previous_value() {
        let req = HttpRequest::get(api_url("v1/payments"))
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("text/html"),
            )
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("application/json"),
            );

        assert_eq!(req.headers.get_all(http::header::ACCEPT).iter().count(), 1);
        assert_eq!(
            req.headers.get(http::header::ACCEPT).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn clone_keeps_headers_and_body() {
        let req1 = HttpRequest::post(api_url("v1/payments"))
            .with_header(
                http::HeaderName::from_static("x-idempotency-key"),
                http::HeaderValue::from_static("abc"),
            )
            .with_body(b"{}".to_vec());
        let req2 = req1.clone();

        assert_eq!(req1.body, req2.body);
        assert_eq!(req1.headers, req2.headers);
    }
}

mod http_response {
    use super::*;

    #[test]
    fn is_success_returns_true_for_2xx() {
        for status in [
            http::StatusCode::OK,
            http::StatusCode::CREATED,
            http::StatusCode::NO_CONTENT,
        ] {
            let resp = HttpResponse::new(status, http::HeaderMap::new(), vec![]);
            assert!(resp.is_success(), "Expected {status} to be success");
        }
    }

    #[test]
    fn is_success_returns_false_for_non_2xx() {
        for status in [
            http::StatusCode::FOUND,
            http::StatusCode::BAD_REQUEST,
            http::StatusCode::NOT_FOUND,
            http::StatusCode::BAD_GATEWAY,
        ] {
            let resp = HttpResponse::new(status, http::HeaderMap::new(), vec![]);
            assert!(!resp.is_success(), "Expected {status} to not be success");
        }
    }

    #[test]
    fn body_text_returns_valid_utf8() {
        let resp = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            br#"{"id":1}"#.to_vec(),
        );

        assert_eq!(resp.body_text(), Some(r#"{"id":1}"#));
    }

    #[test]
    fn body_text_returns_none_for_invalid_utf8() {
        let resp = HttpResponse::new(http::StatusCode::OK, http::HeaderMap::new(), vec![0xFF]);

        assert!(resp.body_text().is_none());
    }
}

mod http_error {
    use super::*;
    use std::error::Error;

    #[test]
    fn connection_error_preserves_source() {
        let error = HttpError::Connection(Box::new(std::io::Error::other("reset by peer")));

        assert!(error.to_string().contains("connection to provider failed"));
        assert!(error.source().unwrap().to_string().contains("reset by peer"));
    }

    #[test]
    fn timeout_displays_message() {
        assert_eq!(HttpError::Timeout.to_string(), "provider did not answer before the timeout");
    }

    #[test]
    fn network_failures_are_connection_and_timeout_only() {
        let connection = HttpError::Connection(Box::new(std::io::Error::other("x")));

        assert!(connection.is_network_failure());
        assert!(HttpError::Timeout.is_network_failure());
        assert!(!HttpError::InvalidUrl("bad".to_string()).is_network_failure());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpError>();
    }
}

mod http_client_trait {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingClient {
        calls: AtomicUsize,
    }

    impl HttpClient for CountingClient {
        async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse::new(
                http::StatusCode::OK,
                http::HeaderMap::new(),
                vec![],
            ))
        }
    }

    #[tokio::test]
    async fn arc_forwards_to_inner_client() {
        let client = Arc::new(CountingClient {
            calls: AtomicUsize::new(0),
        });
        let shared = Arc::clone(&client);

        shared.request(HttpRequest::get(api_url("a"))).await.unwrap();
        shared.request(HttpRequest::get(api_url("b"))).await.unwrap();

        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn trait_is_send_sync() {
        fn assert_client<T: HttpClient>() {}
        assert_client::<CountingClient>();
        assert_client::<Arc<CountingClient>>();
    }
}
