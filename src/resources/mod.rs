//! Typed accessors for the provider's REST resources.
//!
//! Each accessor borrows the client's [`RequestPipeline`], validates its
//! input, sends one request and maps the wire response into a domain type.
//! Wire structs stay private to their module.

mod customers;
mod installments;
mod orders;
mod payments;
mod subscriptions;

#[cfg(test)]
mod orders_tests;
#[cfg(test)]
mod subscriptions_tests;

pub use customers::{Card, Cards, CreateCustomer, Customer, Customers, UpdateCustomer};
pub use installments::{InstallmentOption, InstallmentQuery, Installments, PayerCost};
pub use orders::{
    BackUrls, CheckoutOrder, CreateOrder, InstallmentLimits, OrderItem, OrderPayer, Orders,
};
pub use payments::{
    CreatePayment, Payer, PayerInfo, Payment, PaymentFilters, Payments, Refund, RefundRequest,
};
pub use subscriptions::{
    CreateSubscription, Frequency, FrequencyType, Subscription, SubscriptionFilters,
    SubscriptionStatus, Subscriptions,
};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pipeline::{OutboundRequest, RequestPipeline};
use crate::time::Sleeper;
use crate::transport::HttpClient;

/// Currency used when a caller does not name one.
pub const DEFAULT_CURRENCY: &str = "BRL";

/// Page size used by list operations when none is given.
pub const DEFAULT_PAGE_LIMIT: u32 = 30;

/// A tax document identifying a person, e.g. `CPF 12345678900`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    #[serde(rename = "type")]
    pub kind: String,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub area_code: String,
    pub number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub federal_unit: Option<String>,
}

/// One page of a search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    /// True when results exist beyond this page
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Builds a page, deriving `has_more` from `offset + results < total`.
    #[must_use]
    pub fn new(results: Vec<T>, total: u64, limit: u64, offset: u64) -> Self {
        let seen = offset.saturating_add(results.len() as u64);
        Self {
            has_more: seen < total,
            results,
            total,
            limit,
            offset,
        }
    }
}

#[derive(Deserialize)]
struct WireSearch<W> {
    results: Option<Vec<W>>,
    paging: Option<WirePaging>,
}

#[derive(Default, Deserialize)]
struct WirePaging {
    total: Option<u64>,
    limit: Option<u64>,
    offset: Option<u64>,
}

/// Sends `request` and decodes the JSON response body.
async fn fetch<H, S, T>(pipeline: &RequestPipeline<H, S>, request: OutboundRequest) -> Result<T>
where
    H: HttpClient,
    S: Sleeper,
    T: DeserializeOwned,
{
    let response = pipeline.send(request).await?;
    Ok(response.json()?)
}

/// Sends `request` and discards the response body.
async fn execute<H, S>(pipeline: &RequestPipeline<H, S>, request: OutboundRequest) -> Result<()>
where
    H: HttpClient,
    S: Sleeper,
{
    pipeline.send(request).await?;
    Ok(())
}
