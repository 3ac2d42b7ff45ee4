//! Tests for the subscriptions accessor.

use std::sync::Arc;

use http::Method;
use serde_json::json;

use super::{
    CreateSubscription, Frequency, FrequencyType, SubscriptionFilters, SubscriptionStatus,
    Subscriptions,
};
use crate::error::Error;
use crate::test_fixtures::{ScriptedClient, pipeline, query_pairs};

const SUBSCRIPTION: &str = r#"{
    "id": "2c938084",
    "status": "authorized",
    "payer_email": "ana@example.com",
    "reason": "Pro plan",
    "auto_recurring": {"transaction_amount": 29.9, "currency_id": "BRL"},
    "next_payment_date": "2024-06-01T00:00:00.000-03:00",
    "date_created": "2024-05-01T00:00:00.000-03:00"
}"#;

#[tokio::test]
async fn create_defaults_to_monthly_brl() {
    let client = Arc::new(ScriptedClient::json(201, SUBSCRIPTION));
    let pipeline = pipeline(&client);
    let subscription = CreateSubscription {
        description: Some("Pro plan".to_string()),
        ..CreateSubscription::new("ana@example.com", 29.9)
    };

    let created = Subscriptions::new(&pipeline)
        .create(&subscription)
        .await
        .unwrap();

    let request = client.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.url.path(), "/preapproval");
    assert_eq!(
        client.last_body(),
        json!({
            "payer_email": "ana@example.com",
            "reason": "Pro plan",
            "auto_recurring": {
                "frequency": 1,
                "frequency_type": "months",
                "transaction_amount": 29.9,
                "currency_id": "BRL"
            }
        })
    );
    assert_eq!(created.status, "authorized");
    assert_eq!(created.amount, 29.9);
}

#[tokio::test]
async fn create_maps_optional_links() {
    let client = Arc::new(ScriptedClient::json(201, SUBSCRIPTION));
    let pipeline = pipeline(&client);
    let subscription = CreateSubscription {
        frequency: Frequency {
            kind: FrequencyType::Days,
            every: 15,
        },
        repetitions: Some(12),
        plan_id: Some("plan-1".to_string()),
        customer_id: Some("cus-1".to_string()),
        ..CreateSubscription::new("ana@example.com", 10.0)
    };

    Subscriptions::new(&pipeline)
        .create(&subscription)
        .await
        .unwrap();

    let body = client.last_body();
    assert_eq!(body["auto_recurring"]["frequency"], 15);
    assert_eq!(body["auto_recurring"]["frequency_type"], "days");
    assert_eq!(body["auto_recurring"]["repetitions"], 12);
    assert_eq!(body["preapproval_plan_id"], "plan-1");
    assert_eq!(body["payer_id"], "cus-1");
}

#[tokio::test]
async fn create_validates_before_sending() {
    let client = Arc::new(ScriptedClient::new(vec![]));
    let pipeline = pipeline(&client);
    let subscriptions = Subscriptions::new(&pipeline);

    let zero_amount = CreateSubscription::new("ana@example.com", 0.0);
    let bad_email = CreateSubscription::new("ana", 10.0);
    let zero_frequency = CreateSubscription {
        frequency: Frequency {
            kind: FrequencyType::Months,
            every: 0,
        },
        ..CreateSubscription::new("ana@example.com", 10.0)
    };

    for (input, field) in [
        (zero_amount, "amount"),
        (bad_email, "payer_email"),
        (zero_frequency, "frequency"),
    ] {
        let err = subscriptions.create(&input).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ref e) if e.field == field));
    }
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn update_status_puts_lowercase_status() {
    let client = Arc::new(ScriptedClient::json(200, SUBSCRIPTION));
    let pipeline = pipeline(&client);

    Subscriptions::new(&pipeline)
        .update_status("2c938084", SubscriptionStatus::Paused)
        .await
        .unwrap();

    let request = client.last_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.url.path(), "/preapproval/2c938084");
    assert_eq!(client.last_body(), json!({"status": "paused"}));
}

#[tokio::test]
async fn list_echoes_filter_paging() {
    let body = format!(r#"{{"results": [{SUBSCRIPTION}], "paging": {{"total": 11, "limit": 99}}}}"#);
    let client = Arc::new(ScriptedClient::json(200, &body));
    let pipeline = pipeline(&client);
    let filters = SubscriptionFilters {
        status: Some("authorized".to_string()),
        limit: Some(5),
        offset: Some(10),
    };

    let page = Subscriptions::new(&pipeline).list(&filters).await.unwrap();

    assert_eq!(
        query_pairs(&client.last_request()),
        [
            ("status".to_string(), "authorized".to_string()),
            ("limit".to_string(), "5".to_string()),
            ("offset".to_string(), "10".to_string()),
        ]
    );
    assert_eq!((page.total, page.limit, page.offset), (11, 5, 10));
    assert!(!page.has_more);
}
