//! Checkout orders (`/checkout/preferences`), i.e. hosted payment links.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{DEFAULT_CURRENCY, Identification, fetch};
use crate::error::Result;
use crate::pipeline::{OutboundRequest, RequestPipeline};
use crate::time::Sleeper;
use crate::transport::HttpClient;
use crate::validation::{self, ValidationError};

/// One line of a checkout order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(rename = "currency_id", default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl OrderItem {
    #[must_use]
    pub fn new(title: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            title: title.into(),
            quantity,
            unit_price,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderPayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<Identification>,
}

/// Where the payer is sent back to after checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackUrls {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

/// Installment bounds offered at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InstallmentLimits {
    #[serde(rename = "default_installments", skip_serializing_if = "Option::is_none")]
    pub default: Option<u32>,
    #[serde(rename = "installments", skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    #[serde(rename = "min_installments", skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
}

/// Input for [`Orders::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateOrder {
    pub items: Vec<OrderItem>,
    pub payer: Option<OrderPayer>,
    pub external_reference: Option<String>,
    pub notification_url: Option<String>,
    pub back_urls: Option<BackUrls>,
    /// e.g. `approved` to redirect automatically on approval
    pub auto_return: Option<String>,
    pub expires: Option<bool>,
    pub expiration_date_from: Option<String>,
    pub expiration_date_to: Option<String>,
    /// Payment method ids not offered at checkout
    pub excluded_payment_methods: Vec<String>,
    pub installments: Option<InstallmentLimits>,
    pub marketplace: Option<String>,
    pub marketplace_fee: Option<f64>,
    pub metadata: Option<Value>,
}

impl CreateOrder {
    #[must_use]
    pub fn new(items: Vec<OrderItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(ValidationError::new("items", "must not be empty").into());
        }
        for item in &self.items {
            if item.quantity == 0 {
                return Err(ValidationError::new("items.quantity", "must be at least 1").into());
            }
            validation::positive_amount("items.unit_price", item.unit_price)?;
        }
        validation::callback_url("notification_url", self.notification_url.as_deref())?;
        if let Some(urls) = &self.back_urls {
            validation::callback_url("back_urls.success", urls.success.as_deref())?;
            validation::callback_url("back_urls.pending", urls.pending.as_deref())?;
            validation::callback_url("back_urls.failure", urls.failure.as_deref())?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct OrderBody<'a> {
    items: Vec<OrderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payer: Option<&'a OrderPayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    back_urls: Option<&'a BackUrls>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_return: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_date_from: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_date_to: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    excluded_payment_methods: Vec<ExcludedMethod<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_methods: Option<InstallmentLimits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    marketplace: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    marketplace_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a Value>,
}

#[derive(Serialize)]
struct ExcludedMethod<'a> {
    id: &'a str,
}

impl<'a> From<&'a CreateOrder> for OrderBody<'a> {
    fn from(o: &'a CreateOrder) -> Self {
        let items = o
            .items
            .iter()
            .map(|item| OrderItem {
                currency: Some(item.currency.clone().unwrap_or_else(|| DEFAULT_CURRENCY.to_string())),
                ..item.clone()
            })
            .collect();
        Self {
            items,
            payer: o.payer.as_ref(),
            external_reference: o.external_reference.as_deref(),
            notification_url: o.notification_url.as_deref(),
            back_urls: o.back_urls.as_ref(),
            auto_return: o.auto_return.as_deref(),
            expires: o.expires,
            expiration_date_from: o.expiration_date_from.as_deref(),
            expiration_date_to: o.expiration_date_to.as_deref(),
            excluded_payment_methods: o
                .excluded_payment_methods
                .iter()
                .map(|id| ExcludedMethod { id })
                .collect(),
            payment_methods: o.installments,
            marketplace: o.marketplace.as_deref(),
            marketplace_fee: o.marketplace_fee,
            metadata: o.metadata.as_ref(),
        }
    }
}

/// A created checkout order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutOrder {
    pub id: String,
    /// URL the payer opens to pay
    pub init_point: String,
    pub sandbox_init_point: Option<String>,
    pub external_reference: Option<String>,
    pub items: Vec<OrderItem>,
    pub created_at: Option<String>,
}

#[derive(Deserialize)]
struct WireOrder {
    id: Option<String>,
    init_point: Option<String>,
    sandbox_init_point: Option<String>,
    external_reference: Option<String>,
    items: Option<Vec<OrderItem>>,
    date_created: Option<String>,
}

impl WireOrder {
    fn into_order(self, items: Option<Vec<OrderItem>>) -> CheckoutOrder {
        CheckoutOrder {
            id: self.id.unwrap_or_default(),
            init_point: self.init_point.unwrap_or_default(),
            sandbox_init_point: self.sandbox_init_point,
            external_reference: self.external_reference,
            items: items.or(self.items).unwrap_or_default(),
            created_at: self.date_created,
        }
    }
}

/// Accessor for `/checkout/preferences`.
#[derive(Debug)]
pub struct Orders<'a, H, S> {
    pipeline: &'a RequestPipeline<H, S>,
}

impl<'a, H, S> Orders<'a, H, S> {
    pub(crate) const fn new(pipeline: &'a RequestPipeline<H, S>) -> Self {
        Self { pipeline }
    }
}

impl<H: HttpClient, S: Sleeper> Orders<'_, H, S> {
    /// Creates a checkout order and returns its payment link.
    ///
    /// The returned order carries the items as submitted.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty item list, a zero quantity, a
    /// non-positive unit price or a bad callback URL; otherwise any provider
    /// error.
    pub async fn create(&self, order: &CreateOrder) -> Result<CheckoutOrder> {
        order.validate()?;
        let request =
            OutboundRequest::post("/checkout/preferences").with_json(&OrderBody::from(order))?;
        let wire: WireOrder = fetch(self.pipeline, request).await?;
        let created = wire.into_order(Some(order.items.clone()));
        debug!(order_id = %created.id, "Checkout order created");
        Ok(created)
    }

    /// Fetches a checkout order by id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed id, or any provider error.
    pub async fn get(&self, order_id: &str) -> Result<CheckoutOrder> {
        validation::resource_id("order_id", order_id)?;
        let request = OutboundRequest::get(format!("/checkout/preferences/{order_id}"));
        let wire: WireOrder = fetch(self.pipeline, request).await?;
        Ok(wire.into_order(None))
    }
}
