//! Installment options for a card and amount.

use serde::{Deserialize, Serialize};

use super::{DEFAULT_CURRENCY, fetch};
use crate::error::Result;
use crate::pipeline::{OutboundRequest, RequestPipeline};
use crate::time::Sleeper;
use crate::transport::HttpClient;
use crate::validation::{self, ValidationError};

/// Input for [`Installments::get`].
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentQuery {
    pub amount: f64,
    /// First 6 to 8 digits of the card number
    pub bin: String,
    /// Defaults to `BRL`
    pub currency: Option<String>,
}

impl InstallmentQuery {
    #[must_use]
    pub fn new(amount: f64, bin: impl Into<String>) -> Self {
        Self {
            amount,
            bin: bin.into(),
            currency: None,
        }
    }
}

/// Installment plans offered by one payment method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallmentOption {
    pub payment_method_id: String,
    pub payment_type: String,
    pub payer_costs: Vec<PayerCost>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayerCost {
    pub installments: u32,
    pub installment_amount: f64,
    pub total_amount: f64,
    /// Interest rate in percent
    pub rate: f64,
    pub labels: Vec<String>,
}

#[derive(Deserialize)]
struct WireOption {
    payment_method_id: Option<String>,
    payment_type_id: Option<String>,
    payer_costs: Option<Vec<WirePayerCost>>,
}

#[derive(Deserialize)]
struct WirePayerCost {
    installments: Option<u32>,
    installment_amount: Option<f64>,
    total_amount: Option<f64>,
    installment_rate: Option<f64>,
    labels: Option<Vec<String>>,
}

impl From<WirePayerCost> for PayerCost {
    fn from(w: WirePayerCost) -> Self {
        Self {
            installments: w.installments.unwrap_or(1),
            installment_amount: w.installment_amount.unwrap_or_default(),
            total_amount: w.total_amount.unwrap_or_default(),
            rate: w.installment_rate.unwrap_or_default(),
            labels: w.labels.unwrap_or_default(),
        }
    }
}

impl From<WireOption> for InstallmentOption {
    fn from(w: WireOption) -> Self {
        Self {
            payment_method_id: w.payment_method_id.unwrap_or_default(),
            payment_type: w.payment_type_id.unwrap_or_default(),
            payer_costs: w
                .payer_costs
                .unwrap_or_default()
                .into_iter()
                .map(PayerCost::from)
                .collect(),
        }
    }
}

fn validate_bin(bin: &str) -> Result<()> {
    if (6..=8).contains(&bin.len()) && bin.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("bin", "must be 6 to 8 digits").into())
    }
}

/// Accessor for `/v1/payment_methods/installments`.
#[derive(Debug)]
pub struct Installments<'a, H, S> {
    pipeline: &'a RequestPipeline<H, S>,
}

impl<'a, H, S> Installments<'a, H, S> {
    pub(crate) const fn new(pipeline: &'a RequestPipeline<H, S>) -> Self {
        Self { pipeline }
    }
}

impl<H: HttpClient, S: Sleeper> Installments<'_, H, S> {
    /// Lists installment plans available for `query`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive amount or a malformed
    /// BIN, or any provider error.
    pub async fn get(&self, query: &InstallmentQuery) -> Result<Vec<InstallmentOption>> {
        validation::positive_amount("amount", query.amount)?;
        validate_bin(&query.bin)?;

        let request = OutboundRequest::get("/v1/payment_methods/installments")
            .with_query("amount", query.amount)
            .with_query("bin", &query.bin)
            .with_query(
                "currency_id",
                query.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
            );
        let options: Option<Vec<WireOption>> = fetch(self.pipeline, request).await?;
        Ok(options
            .unwrap_or_default()
            .into_iter()
            .map(InstallmentOption::from)
            .collect())
    }
}
