//! Tests for the checkout orders accessor.

use std::sync::Arc;

use serde_json::json;

use super::{BackUrls, CreateOrder, InstallmentLimits, OrderItem, Orders};
use crate::error::Error;
use crate::test_fixtures::{ScriptedClient, pipeline};

const ORDER: &str = r#"{
    "id": "202809963-920c288b",
    "init_point": "https://www.mercadopago.com.br/checkout/v1/redirect?pref_id=202809963-920c288b",
    "sandbox_init_point": "https://sandbox.mercadopago.com.br/checkout/v1/redirect?pref_id=202809963-920c288b",
    "date_created": "2024-05-01T10:00:00.000-03:00",
    "items": [{"id": "sku-1", "title": "Course", "quantity": 1, "unit_price": 197, "currency_id": "BRL"}]
}"#;

fn course() -> OrderItem {
    OrderItem::new("Course", 1, 197.0)
}

#[tokio::test]
async fn create_posts_items_with_default_currency() {
    let client = Arc::new(ScriptedClient::json(201, ORDER));
    let pipeline = pipeline(&client);
    let order = CreateOrder {
        back_urls: Some(BackUrls {
            success: Some("https://shop.example.com/thanks".to_string()),
            ..BackUrls::default()
        }),
        auto_return: Some("approved".to_string()),
        excluded_payment_methods: vec!["bolbradesco".to_string()],
        installments: Some(InstallmentLimits {
            max: Some(6),
            ..InstallmentLimits::default()
        }),
        ..CreateOrder::new(vec![course()])
    };

    let created = Orders::new(&pipeline).create(&order).await.unwrap();

    assert_eq!(client.last_request().url.path(), "/checkout/preferences");
    assert_eq!(
        client.last_body(),
        json!({
            "items": [{"title": "Course", "quantity": 1, "unit_price": 197.0, "currency_id": "BRL"}],
            "back_urls": {"success": "https://shop.example.com/thanks"},
            "auto_return": "approved",
            "excluded_payment_methods": [{"id": "bolbradesco"}],
            "payment_methods": {"installments": 6}
        })
    );
    assert_eq!(created.id, "202809963-920c288b");
    assert!(created.init_point.starts_with("https://www.mercadopago.com.br/"));
    assert_eq!(created.items, vec![course()]);
}

#[tokio::test]
async fn create_validates_items() {
    let client = Arc::new(ScriptedClient::new(vec![]));
    let pipeline = pipeline(&client);
    let orders = Orders::new(&pipeline);

    let cases = [
        (CreateOrder::new(vec![]), "items"),
        (
            CreateOrder::new(vec![OrderItem::new("Course", 0, 10.0)]),
            "items.quantity",
        ),
        (
            CreateOrder::new(vec![OrderItem::new("Course", 1, 0.0)]),
            "items.unit_price",
        ),
    ];
    for (order, field) in cases {
        let err = orders.create(&order).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ref e) if e.field == field));
    }
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn create_rejects_non_http_back_url() {
    let client = Arc::new(ScriptedClient::new(vec![]));
    let pipeline = pipeline(&client);
    let order = CreateOrder {
        back_urls: Some(BackUrls {
            failure: Some("javascript:alert(1)".to_string()),
            ..BackUrls::default()
        }),
        ..CreateOrder::new(vec![course()])
    };

    let err = Orders::new(&pipeline).create(&order).await.unwrap_err();

    assert!(matches!(err, Error::Validation(ref e) if e.field == "back_urls.failure"));
}

#[tokio::test]
async fn get_decodes_provider_items() {
    let client = Arc::new(ScriptedClient::json(200, ORDER));
    let pipeline = pipeline(&client);

    let order = Orders::new(&pipeline)
        .get("202809963-920c288b")
        .await
        .unwrap();

    assert_eq!(
        client.last_request().url.path(),
        "/checkout/preferences/202809963-920c288b"
    );
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].id.as_deref(), Some("sku-1"));
    assert_eq!(order.items[0].unit_price, 197.0);
    assert_eq!(order.items[0].currency.as_deref(), Some("BRL"));
}
