//! Tests for failure classification and `normalize`.

use super::{Failure, ProviderError, normalize};
use crate::transport::{HttpError, HttpResponse};

fn status_failure(status: u16, body: &str) -> Failure {
    Failure::Status(HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    ))
}

mod classification {
    use super::*;

    #[test]
    fn network_failures_are_retriable() {
        assert!(Failure::Transport(HttpError::Timeout).is_retriable());
        assert!(
            Failure::Transport(HttpError::Connection(Box::new(std::io::Error::other("x"))))
                .is_retriable()
        );
    }

    #[test]
    fn invalid_url_is_not_retriable() {
        assert!(!Failure::Transport(HttpError::InvalidUrl("bad".into())).is_retriable());
    }

    #[test]
    fn server_errors_are_retriable() {
        for status in [500, 502, 503, 504, 599] {
            assert!(status_failure(status, "").is_retriable(), "{status}");
        }
    }

    #[test]
    fn client_errors_are_terminal() {
        for status in [400, 401, 404, 408, 409, 429, 499] {
            assert!(!status_failure(status, "").is_retriable(), "{status}");
        }
    }
}

mod message_resolution {
    use super::*;

    #[test]
    fn prefers_message_field() {
        let error = normalize(&status_failure(
            400,
            r#"{"message":"invalid amount","error":"bad_request","cause":[{"description":"c"}]}"#,
        ));

        assert_eq!(error.status, 400);
        assert_eq!(error.message, "invalid amount");
    }

    #[test]
    fn falls_back_to_error_field() {
        let error = normalize(&status_failure(
            401,
            r#"{"error":"unauthorized","cause":[{"description":"c"}]}"#,
        ));

        assert_eq!(error.message, "unauthorized");
    }

    #[test]
    fn falls_back_to_first_cause_description() {
        let error = normalize(&status_failure(
            400,
            r#"{"cause":[{"code":2067,"description":"Invalid user identification number"},{"description":"second"}]}"#,
        ));

        assert_eq!(error.message, "Invalid user identification number");
    }

    #[test]
    fn empty_fields_are_skipped() {
        let error = normalize(&status_failure(
            400,
            r#"{"message":"","error":"  ","cause":[{"description":"real reason"}]}"#,
        ));

        assert_eq!(error.message, "real reason");
    }

    #[test]
    fn non_string_fields_are_skipped() {
        let error = normalize(&status_failure(400, r#"{"message":42,"error":"bad_request"}"#));

        assert_eq!(error.message, "bad_request");
    }

    #[test]
    fn falls_back_to_transport_text_for_bare_status() {
        let error = normalize(&status_failure(404, ""));

        assert_eq!(error.message, "Request failed with status code 404");
        assert!(error.raw.is_none());
    }

    #[test]
    fn no_response_has_status_zero_and_transport_text() {
        let error = normalize(&Failure::Transport(HttpError::Timeout));

        assert_eq!(error.status, 0);
        assert_eq!(error.message, "provider did not answer before the timeout");
        assert!(error.raw.is_none());
    }
}

mod raw_body {
    use super::*;

    #[test]
    fn json_body_is_kept_as_value() {
        let error = normalize(&status_failure(400, r#"{"message":"m","status":400}"#));

        assert_eq!(error.raw, Some(serde_json::json!({"message":"m","status":400})));
    }

    #[test]
    fn text_body_is_kept_as_string() {
        let error = normalize(&status_failure(502, "<html>Bad Gateway</html>"));

        assert_eq!(
            error.raw,
            Some(serde_json::Value::String("<html>Bad Gateway</html>".into()))
        );
        assert_eq!(error.message, "Request failed with status code 502");
    }
}

mod provider_error {
    use super::*;

    #[test]
    fn display_includes_status_and_message() {
        let error = ProviderError {
            status: 404,
            message: "Payment not found".into(),
            raw: None,
        };

        assert_eq!(error.to_string(), "MercadoPago API error 404: Payment not found");
    }

    #[test]
    fn is_client_error_matches_4xx_only() {
        let with_status = |status| ProviderError {
            status,
            message: String::new(),
            raw: None,
        };

        assert!(with_status(400).is_client_error());
        assert!(with_status(499).is_client_error());
        assert!(!with_status(500).is_client_error());
        assert!(!with_status(0).is_client_error());
    }
}
