//! Payments: create, look up, search, cancel, refund and capture.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{DEFAULT_CURRENCY, DEFAULT_PAGE_LIMIT, Identification, Page, WireSearch};
use super::{Address, Phone, fetch};
use crate::error::Result;
use crate::pipeline::{OutboundRequest, RequestPipeline};
use crate::time::Sleeper;
use crate::transport::HttpClient;
use crate::validation;
use crate::wire::{WireId, id_string};

/// Input for [`Payments::create`].
#[derive(Debug, Clone, Default)]
pub struct CreatePayment {
    pub amount: f64,
    /// Payment method id, e.g. `pix`, `bolbradesco` or a card brand
    pub method: String,
    /// Defaults to `BRL`
    pub currency: Option<String>,
    pub description: Option<String>,
    pub payer: Payer,
    pub external_reference: Option<String>,
    /// Defaults to 1
    pub installments: Option<u32>,
    /// Card token produced by the provider's browser SDK
    pub card_token: Option<String>,
    pub issuer_id: Option<String>,
    pub notification_url: Option<String>,
    pub metadata: Option<Value>,
    /// Overrides the generated idempotency key
    pub idempotency_key: Option<String>,
}

impl CreatePayment {
    /// Creates a payment request with the required fields set.
    #[must_use]
    pub fn new(amount: f64, method: impl Into<String>, payer_email: impl Into<String>) -> Self {
        Self {
            amount,
            method: method.into(),
            payer: Payer {
                email: Some(payer_email.into()),
                ..Payer::default()
            },
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        validation::positive_amount("amount", self.amount)?;
        if self.method.trim().is_empty() {
            return Err(validation::ValidationError::new("method", "is required").into());
        }
        validation::email("payer.email", self.payer.email.as_deref())?;
        validation::callback_url("notification_url", self.notification_url.as_deref())?;
        Ok(())
    }
}

/// The person paying.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Payer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "first_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "last_name", skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<Identification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

#[derive(Serialize)]
struct PaymentBody<'a> {
    transaction_amount: f64,
    payment_method_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    currency_id: &'a str,
    installments: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a Value>,
    payer: &'a Payer,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issuer_id: Option<&'a str>,
}

impl<'a> From<&'a CreatePayment> for PaymentBody<'a> {
    fn from(p: &'a CreatePayment) -> Self {
        Self {
            transaction_amount: p.amount,
            payment_method_id: &p.method,
            description: p.description.as_deref(),
            currency_id: p.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
            installments: p.installments.unwrap_or(1),
            external_reference: p.external_reference.as_deref(),
            notification_url: p.notification_url.as_deref(),
            metadata: p.metadata.as_ref(),
            payer: &p.payer,
            token: p.card_token.as_deref(),
            issuer_id: p.issuer_id.as_deref(),
        }
    }
}

/// Payer details as reported on a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PayerInfo {
    pub email: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub identification: Option<Identification>,
}

/// A payment as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub id: String,
    /// e.g. `pending`, `approved`, `rejected`, `cancelled`, `refunded`
    pub status: String,
    pub status_detail: String,
    pub amount: f64,
    pub net_amount: Option<f64>,
    pub fee_amount: Option<f64>,
    pub method: String,
    pub currency: String,
    pub description: String,
    pub installments: u32,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub payer: PayerInfo,
    /// PIX copy-and-paste code
    pub qr_code: Option<String>,
    pub qr_code_base64: Option<String>,
    pub pix_expiration_date: Option<String>,
    pub ticket_url: Option<String>,
    /// Boleto barcode
    pub barcode: Option<String>,
    pub boleto_expiration_date: Option<String>,
    pub last_four_digits: Option<String>,
    pub card_holder: Option<String>,
    pub external_reference: Option<String>,
    pub metadata: Option<Value>,
    pub refunds: Vec<Refund>,
}

/// Filters for [`Payments::list`].
#[derive(Debug, Clone, Default)]
pub struct PaymentFilters {
    pub status: Option<String>,
    pub method: Option<String>,
    pub external_reference: Option<String>,
    /// Lower bound on the creation date, RFC 3339
    pub created_from: Option<String>,
    /// Upper bound on the creation date, RFC 3339
    pub created_to: Option<String>,
    /// Defaults to 30
    pub limit: Option<u32>,
    /// Defaults to 0
    pub offset: Option<u32>,
}

/// Input for [`Payments::refund`].
///
/// Without an amount the whole payment is refunded.
#[derive(Debug, Clone, PartialEq)]
pub struct RefundRequest {
    pub payment_id: String,
    pub amount: Option<f64>,
    pub idempotency_key: Option<String>,
}

impl RefundRequest {
    /// Requests a total refund of `payment_id`.
    #[must_use]
    pub fn new(payment_id: impl Into<String>) -> Self {
        Self {
            payment_id: payment_id.into(),
            amount: None,
            idempotency_key: None,
        }
    }

    /// Refunds only `amount`.
    #[must_use]
    pub const fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Uses a caller-chosen idempotency key.
    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

#[derive(Serialize)]
struct RefundBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<f64>,
}

#[derive(Serialize)]
struct CaptureBody {
    capture: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_amount: Option<f64>,
}

#[derive(Serialize)]
struct StatusBody<'a> {
    status: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Refund {
    pub id: String,
    pub amount: f64,
    pub created_at: Option<String>,
}

#[derive(Deserialize)]
struct WireRefund {
    id: Option<WireId>,
    amount: Option<f64>,
    date_created: Option<String>,
}

impl From<WireRefund> for Refund {
    fn from(w: WireRefund) -> Self {
        Self {
            id: id_string(w.id),
            amount: w.amount.unwrap_or_default(),
            created_at: w.date_created,
        }
    }
}

#[derive(Deserialize)]
struct WirePayment {
    id: Option<WireId>,
    status: Option<String>,
    status_detail: Option<String>,
    transaction_amount: Option<f64>,
    transaction_details: Option<WireTransactionDetails>,
    fee_details: Option<Vec<WireFee>>,
    payment_method_id: Option<String>,
    currency_id: Option<String>,
    description: Option<String>,
    installments: Option<u32>,
    date_created: Option<String>,
    date_last_updated: Option<String>,
    payer: Option<WirePayer>,
    point_of_interaction: Option<WirePointOfInteraction>,
    ticket_url: Option<String>,
    barcode: Option<WireBarcode>,
    date_of_expiration: Option<String>,
    card: Option<WireCard>,
    external_reference: Option<String>,
    metadata: Option<Value>,
    refunds: Option<Vec<WireRefund>>,
}

#[derive(Deserialize)]
struct WireTransactionDetails {
    net_received_amount: Option<f64>,
}

#[derive(Deserialize)]
struct WireFee {
    amount: Option<f64>,
}

#[derive(Deserialize)]
struct WirePayer {
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    identification: Option<Identification>,
}

#[derive(Deserialize)]
struct WirePointOfInteraction {
    transaction_data: Option<WireTransactionData>,
}

#[derive(Deserialize)]
struct WireTransactionData {
    qr_code: Option<String>,
    qr_code_base64: Option<String>,
    expiration_date: Option<String>,
}

#[derive(Deserialize)]
struct WireBarcode {
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireCard {
    last_four_digits: Option<String>,
    cardholder: Option<WireCardholder>,
}

#[derive(Deserialize)]
struct WireCardholder {
    name: Option<String>,
}

impl From<WirePayment> for Payment {
    fn from(w: WirePayment) -> Self {
        let pix = w.point_of_interaction.and_then(|p| p.transaction_data);
        let (qr_code, qr_code_base64, pix_expiration_date) = match pix {
            Some(t) => (t.qr_code, t.qr_code_base64, t.expiration_date),
            None => (None, None, None),
        };
        let payer = w.payer.map_or_else(PayerInfo::default, |p| PayerInfo {
            email: p.email,
            name: p.first_name,
            surname: p.last_name,
            identification: p.identification,
        });
        let (last_four_digits, card_holder) = match w.card {
            Some(c) => (c.last_four_digits, c.cardholder.and_then(|h| h.name)),
            None => (None, None),
        };

        Self {
            id: id_string(w.id),
            status: w.status.unwrap_or_default(),
            status_detail: w.status_detail.unwrap_or_default(),
            amount: w.transaction_amount.unwrap_or_default(),
            net_amount: w.transaction_details.and_then(|d| d.net_received_amount),
            fee_amount: w
                .fee_details
                .and_then(|fees| fees.into_iter().next())
                .and_then(|fee| fee.amount),
            method: w.payment_method_id.unwrap_or_default(),
            currency: w.currency_id.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            description: w.description.unwrap_or_default(),
            installments: w.installments.unwrap_or(1),
            updated_at: w.date_last_updated.or_else(|| w.date_created.clone()),
            created_at: w.date_created,
            payer,
            qr_code,
            qr_code_base64,
            pix_expiration_date,
            ticket_url: w.ticket_url,
            barcode: w.barcode.and_then(|b| b.content),
            boleto_expiration_date: w.date_of_expiration,
            last_four_digits,
            card_holder,
            external_reference: w.external_reference,
            metadata: w.metadata,
            refunds: w
                .refunds
                .unwrap_or_default()
                .into_iter()
                .map(Refund::from)
                .collect(),
        }
    }
}

/// Accessor for `/v1/payments`.
#[derive(Debug)]
pub struct Payments<'a, H, S> {
    pipeline: &'a RequestPipeline<H, S>,
}

impl<'a, H, S> Payments<'a, H, S> {
    pub(crate) const fn new(pipeline: &'a RequestPipeline<H, S>) -> Self {
        Self { pipeline }
    }
}

impl<H: HttpClient, S: Sleeper> Payments<'_, H, S> {
    /// Creates a payment.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive amount, a missing or
    /// malformed payer email or a bad notification URL; otherwise any
    /// provider error.
    pub async fn create(&self, payment: &CreatePayment) -> Result<Payment> {
        payment.validate()?;

        let mut request = OutboundRequest::post("/v1/payments").with_json(&PaymentBody::from(payment))?;
        if let Some(key) = &payment.idempotency_key {
            request = request.with_idempotency_key(key.as_str());
        }

        let created: Payment = fetch::<_, _, WirePayment>(self.pipeline, request).await?.into();
        debug!(payment_id = %created.id, status = %created.status, "Payment created");
        Ok(created)
    }

    /// Fetches a payment by id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed id, or any provider error.
    pub async fn get(&self, payment_id: &str) -> Result<Payment> {
        validation::resource_id("payment_id", payment_id)?;
        let request = OutboundRequest::get(format!("/v1/payments/{payment_id}"));
        Ok(fetch::<_, _, WirePayment>(self.pipeline, request).await?.into())
    }

    /// Searches payments.
    ///
    /// # Errors
    ///
    /// Returns any provider error.
    pub async fn list(&self, filters: &PaymentFilters) -> Result<Page<Payment>> {
        let request = OutboundRequest::get("/v1/payments/search")
            .with_optional_query("status", filters.status.as_deref())
            .with_optional_query("payment_method_id", filters.method.as_deref())
            .with_optional_query("external_reference", filters.external_reference.as_deref())
            .with_optional_query("range.date_created.from", filters.created_from.as_deref())
            .with_optional_query("range.date_created.to", filters.created_to.as_deref())
            .with_query("limit", filters.limit.unwrap_or(DEFAULT_PAGE_LIMIT))
            .with_query("offset", filters.offset.unwrap_or(0));

        let search: WireSearch<WirePayment> = fetch(self.pipeline, request).await?;
        let results: Vec<Payment> = search
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Payment::from)
            .collect();
        let paging = search.paging.unwrap_or_default();
        let len = results.len() as u64;
        Ok(Page::new(
            results,
            paging.total.unwrap_or(len),
            paging.limit.unwrap_or(len),
            paging.offset.unwrap_or(0),
        ))
    }

    /// Cancels a pending payment.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed id, or any provider error.
    pub async fn cancel(&self, payment_id: &str) -> Result<Payment> {
        validation::resource_id("payment_id", payment_id)?;
        let request = OutboundRequest::put(format!("/v1/payments/{payment_id}"))
            .with_json(&StatusBody { status: "cancelled" })?;
        Ok(fetch::<_, _, WirePayment>(self.pipeline, request).await?.into())
    }

    /// Refunds a payment in full or in part.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed id or a non-positive
    /// amount, or any provider error.
    pub async fn refund(&self, refund: &RefundRequest) -> Result<Refund> {
        validation::resource_id("payment_id", &refund.payment_id)?;
        if let Some(amount) = refund.amount {
            validation::positive_amount("amount", amount)?;
        }

        let mut request = OutboundRequest::post(format!("/v1/payments/{}/refunds", refund.payment_id))
            .with_json(&RefundBody {
                amount: refund.amount,
            })?;
        if let Some(key) = &refund.idempotency_key {
            request = request.with_idempotency_key(key.as_str());
        }

        let created: Refund = fetch::<_, _, WireRefund>(self.pipeline, request).await?.into();
        debug!(payment_id = %refund.payment_id, refund_id = %created.id, "Refund created");
        Ok(created)
    }

    /// Lists the refunds of a payment.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed id, or any provider error.
    pub async fn list_refunds(&self, payment_id: &str) -> Result<Vec<Refund>> {
        validation::resource_id("payment_id", payment_id)?;
        let request = OutboundRequest::get(format!("/v1/payments/{payment_id}/refunds"));
        let refunds: Option<Vec<WireRefund>> = fetch(self.pipeline, request).await?;
        Ok(refunds
            .unwrap_or_default()
            .into_iter()
            .map(Refund::from)
            .collect())
    }

    /// Captures a pre-authorized payment, optionally for a smaller amount.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed id or a non-positive
    /// amount, or any provider error.
    pub async fn capture(&self, payment_id: &str, amount: Option<f64>) -> Result<Payment> {
        validation::resource_id("payment_id", payment_id)?;
        if let Some(amount) = amount {
            validation::positive_amount("amount", amount)?;
        }
        let request = OutboundRequest::put(format!("/v1/payments/{payment_id}")).with_json(&CaptureBody {
            capture: true,
            transaction_amount: amount,
        })?;
        Ok(fetch::<_, _, WirePayment>(self.pipeline, request).await?.into())
    }
}
