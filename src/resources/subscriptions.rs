//! Recurring subscriptions (`/preapproval`).

use serde::{Deserialize, Serialize};

use super::{DEFAULT_CURRENCY, DEFAULT_PAGE_LIMIT, Page, WireSearch, fetch};
use crate::error::Result;
use crate::pipeline::{OutboundRequest, RequestPipeline};
use crate::time::Sleeper;
use crate::transport::HttpClient;
use crate::validation;
use crate::wire::{WireId, id_string};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyType {
    Days,
    #[default]
    Months,
}

/// How often the subscription charges. Defaults to every month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frequency {
    pub kind: FrequencyType,
    pub every: u32,
}

impl Default for Frequency {
    fn default() -> Self {
        Self {
            kind: FrequencyType::Months,
            every: 1,
        }
    }
}

/// Input for [`Subscriptions::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateSubscription {
    pub payer_email: String,
    /// Amount charged on every cycle
    pub amount: f64,
    /// Shown to the payer as the reason for the charge
    pub description: Option<String>,
    pub external_reference: Option<String>,
    pub back_url: Option<String>,
    pub frequency: Frequency,
    /// Defaults to `BRL`
    pub currency: Option<String>,
    /// Number of cycles; unlimited when absent
    pub repetitions: Option<u32>,
    pub plan_id: Option<String>,
    pub card_token_id: Option<String>,
    pub customer_id: Option<String>,
}

impl CreateSubscription {
    #[must_use]
    pub fn new(payer_email: impl Into<String>, amount: f64) -> Self {
        Self {
            payer_email: payer_email.into(),
            amount,
            ..Self::default()
        }
    }
}

/// Target state for [`Subscriptions::update_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Authorized,
    Paused,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscription {
    pub id: String,
    /// e.g. `pending`, `authorized`, `paused`, `cancelled`
    pub status: String,
    pub payer_email: Option<String>,
    pub description: String,
    pub amount: f64,
    pub currency: String,
    pub next_payment_date: String,
    pub created_at: Option<String>,
    pub external_reference: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilters {
    pub status: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Serialize)]
struct SubscriptionBody<'a> {
    payer_email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    back_url: Option<&'a str>,
    auto_recurring: AutoRecurring<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preapproval_plan_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    card_token_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payer_id: Option<&'a str>,
}

#[derive(Serialize)]
struct AutoRecurring<'a> {
    frequency: u32,
    frequency_type: FrequencyType,
    transaction_amount: f64,
    currency_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    repetitions: Option<u32>,
}

impl<'a> From<&'a CreateSubscription> for SubscriptionBody<'a> {
    fn from(s: &'a CreateSubscription) -> Self {
        Self {
            payer_email: &s.payer_email,
            reason: s.description.as_deref(),
            external_reference: s.external_reference.as_deref(),
            back_url: s.back_url.as_deref(),
            auto_recurring: AutoRecurring {
                frequency: s.frequency.every,
                frequency_type: s.frequency.kind,
                transaction_amount: s.amount,
                currency_id: s.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
                repetitions: s.repetitions,
            },
            preapproval_plan_id: s.plan_id.as_deref(),
            card_token_id: s.card_token_id.as_deref(),
            payer_id: s.customer_id.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct StatusBody {
    status: SubscriptionStatus,
}

#[derive(Deserialize)]
struct WireSubscription {
    id: Option<WireId>,
    status: Option<String>,
    payer_email: Option<String>,
    reason: Option<String>,
    auto_recurring: Option<WireAutoRecurring>,
    next_payment_date: Option<String>,
    date_created: Option<String>,
    external_reference: Option<String>,
}

#[derive(Deserialize)]
struct WireAutoRecurring {
    transaction_amount: Option<f64>,
    currency_id: Option<String>,
}

impl From<WireSubscription> for Subscription {
    fn from(w: WireSubscription) -> Self {
        let (amount, currency) = w
            .auto_recurring
            .map_or((None, None), |r| (r.transaction_amount, r.currency_id));
        Self {
            id: id_string(w.id),
            status: w.status.unwrap_or_default(),
            payer_email: w.payer_email,
            description: w.reason.unwrap_or_default(),
            amount: amount.unwrap_or_default(),
            currency: currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            next_payment_date: w.next_payment_date.unwrap_or_default(),
            created_at: w.date_created,
            external_reference: w.external_reference,
        }
    }
}

/// Accessor for `/preapproval`.
#[derive(Debug)]
pub struct Subscriptions<'a, H, S> {
    pipeline: &'a RequestPipeline<H, S>,
}

impl<'a, H, S> Subscriptions<'a, H, S> {
    pub(crate) const fn new(pipeline: &'a RequestPipeline<H, S>) -> Self {
        Self { pipeline }
    }
}

impl<H: HttpClient, S: Sleeper> Subscriptions<'_, H, S> {
    /// Creates a subscription.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad payer email, a non-positive
    /// amount, a zero frequency or a bad back URL; otherwise any provider
    /// error.
    pub async fn create(&self, subscription: &CreateSubscription) -> Result<Subscription> {
        validation::email("payer_email", Some(&subscription.payer_email))?;
        validation::positive_amount("amount", subscription.amount)?;
        if subscription.frequency.every == 0 {
            return Err(validation::ValidationError::new("frequency", "must be at least 1").into());
        }
        validation::callback_url("back_url", subscription.back_url.as_deref())?;

        let request =
            OutboundRequest::post("/preapproval").with_json(&SubscriptionBody::from(subscription))?;
        Ok(fetch::<_, _, WireSubscription>(self.pipeline, request).await?.into())
    }

    /// Fetches a subscription by id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed id, or any provider error.
    pub async fn get(&self, subscription_id: &str) -> Result<Subscription> {
        validation::resource_id("subscription_id", subscription_id)?;
        let request = OutboundRequest::get(format!("/preapproval/{subscription_id}"));
        Ok(fetch::<_, _, WireSubscription>(self.pipeline, request).await?.into())
    }

    /// Pauses, reactivates or cancels a subscription.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed id, or any provider error.
    pub async fn update_status(
        &self,
        subscription_id: &str,
        status: SubscriptionStatus,
    ) -> Result<Subscription> {
        validation::resource_id("subscription_id", subscription_id)?;
        let request = OutboundRequest::put(format!("/preapproval/{subscription_id}"))
            .with_json(&StatusBody { status })?;
        Ok(fetch::<_, _, WireSubscription>(self.pipeline, request).await?.into())
    }

    /// Searches subscriptions.
    ///
    /// The page's limit and offset echo the filters.
    ///
    /// # Errors
    ///
    /// Returns any provider error.
    pub async fn list(&self, filters: &SubscriptionFilters) -> Result<Page<Subscription>> {
        let limit = filters.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        let offset = filters.offset.unwrap_or(0);
        let request = OutboundRequest::get("/preapproval/search")
            .with_optional_query("status", filters.status.as_deref())
            .with_query("limit", limit)
            .with_query("offset", offset);

        let search: WireSearch<WireSubscription> = fetch(self.pipeline, request).await?;
        let results: Vec<Subscription> = search
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Subscription::from)
            .collect();
        let total = search
            .paging
            .and_then(|p| p.total)
            .unwrap_or(results.len() as u64);
        Ok(Page::new(results, total, limit.into(), offset.into()))
    }
}
