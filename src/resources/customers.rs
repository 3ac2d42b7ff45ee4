//! Customers and their saved cards.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{Identification, Phone, WireSearch, execute, fetch};
use crate::error::Result;
use crate::pipeline::{OutboundRequest, RequestPipeline};
use crate::time::Sleeper;
use crate::transport::HttpClient;
use crate::validation;
use crate::wire::{WireId, id_string};

/// Input for [`Customers::create`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateCustomer {
    pub email: String,
    #[serde(rename = "first_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "last_name", skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<Identification>,
    /// Id of an address already registered for the customer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl CreateCustomer {
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }
}

/// Fields to change in [`Customers::update`]; absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCustomer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "first_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "last_name", skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: String,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub cards: Vec<Card>,
    pub created_at: Option<String>,
}

/// A card saved on a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: String,
    pub last_four_digits: String,
    pub expiration_month: Option<u32>,
    pub expiration_year: Option<u32>,
    pub card_holder: String,
    /// Payment method id, e.g. `master`
    pub payment_method: String,
    /// Display name of the brand, e.g. `Mastercard`
    pub brand: String,
}

#[derive(Deserialize)]
struct WireCustomer {
    id: Option<WireId>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    cards: Option<Vec<WireCard>>,
    date_registered: Option<String>,
}

#[derive(Deserialize)]
struct WireCard {
    id: Option<WireId>,
    last_four_digits: Option<String>,
    expiration_month: Option<u32>,
    expiration_year: Option<u32>,
    cardholder: Option<WireCardholder>,
    payment_method: Option<WirePaymentMethod>,
}

#[derive(Deserialize)]
struct WireCardholder {
    name: Option<String>,
}

#[derive(Deserialize)]
struct WirePaymentMethod {
    id: Option<String>,
    name: Option<String>,
}

impl From<WireCard> for Card {
    fn from(w: WireCard) -> Self {
        let (payment_method, brand) = w
            .payment_method
            .map_or((None, None), |m| (m.id, m.name));
        Self {
            id: id_string(w.id),
            last_four_digits: w.last_four_digits.unwrap_or_default(),
            expiration_month: w.expiration_month,
            expiration_year: w.expiration_year,
            card_holder: w.cardholder.and_then(|h| h.name).unwrap_or_default(),
            payment_method: payment_method.unwrap_or_default(),
            brand: brand.unwrap_or_default(),
        }
    }
}

impl From<WireCustomer> for Customer {
    fn from(w: WireCustomer) -> Self {
        Self {
            id: id_string(w.id),
            email: w.email.unwrap_or_default(),
            name: w.first_name.unwrap_or_default(),
            surname: w.last_name.unwrap_or_default(),
            cards: w
                .cards
                .unwrap_or_default()
                .into_iter()
                .map(Card::from)
                .collect(),
            created_at: w.date_registered,
        }
    }
}

#[derive(Serialize)]
struct CardBody<'a> {
    token: &'a str,
}

/// Accessor for `/v1/customers`.
#[derive(Debug)]
pub struct Customers<'a, H, S> {
    pipeline: &'a RequestPipeline<H, S>,
}

impl<'a, H, S> Customers<'a, H, S> {
    pub(crate) const fn new(pipeline: &'a RequestPipeline<H, S>) -> Self {
        Self { pipeline }
    }

    /// Returns the accessor for this customer API's saved cards.
    #[must_use]
    pub const fn cards(&self) -> Cards<'a, H, S> {
        Cards {
            pipeline: self.pipeline,
        }
    }
}

impl<H: HttpClient, S: Sleeper> Customers<'_, H, S> {
    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing or malformed email, or any
    /// provider error.
    pub async fn create(&self, customer: &CreateCustomer) -> Result<Customer> {
        validation::email("email", Some(&customer.email))?;
        let request = OutboundRequest::post("/v1/customers").with_json(customer)?;
        let created: Customer = fetch::<_, _, WireCustomer>(self.pipeline, request).await?.into();
        debug!(customer_id = %created.id, "Customer created");
        Ok(created)
    }

    /// Fetches a customer by id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed id, or any provider error.
    pub async fn get(&self, customer_id: &str) -> Result<Customer> {
        validation::resource_id("customer_id", customer_id)?;
        let request = OutboundRequest::get(format!("/v1/customers/{customer_id}"));
        Ok(fetch::<_, _, WireCustomer>(self.pipeline, request).await?.into())
    }

    /// Returns the first customer registered with `email`, if any.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed email, or any provider
    /// error.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        validation::email("email", Some(email))?;
        let request = OutboundRequest::get("/v1/customers/search").with_query("email", email);
        let search: WireSearch<WireCustomer> = fetch(self.pipeline, request).await?;
        Ok(search
            .results
            .and_then(|results| results.into_iter().next())
            .map(Customer::from))
    }

    /// Updates a customer.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed id or email, or any
    /// provider error.
    pub async fn update(&self, customer_id: &str, changes: &UpdateCustomer) -> Result<Customer> {
        validation::resource_id("customer_id", customer_id)?;
        if changes.email.is_some() {
            validation::email("email", changes.email.as_deref())?;
        }
        let request = OutboundRequest::put(format!("/v1/customers/{customer_id}")).with_json(changes)?;
        Ok(fetch::<_, _, WireCustomer>(self.pipeline, request).await?.into())
    }

    /// Deletes a customer.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed id, or any provider error.
    pub async fn delete(&self, customer_id: &str) -> Result<()> {
        validation::resource_id("customer_id", customer_id)?;
        execute(
            self.pipeline,
            OutboundRequest::delete(format!("/v1/customers/{customer_id}")),
        )
        .await
    }
}

/// Accessor for `/v1/customers/{id}/cards`.
#[derive(Debug)]
pub struct Cards<'a, H, S> {
    pipeline: &'a RequestPipeline<H, S>,
}

impl<H: HttpClient, S: Sleeper> Cards<'_, H, S> {
    /// Saves a tokenized card on a customer.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed id or empty token, or any
    /// provider error.
    pub async fn add(&self, customer_id: &str, token: &str) -> Result<Card> {
        validation::resource_id("customer_id", customer_id)?;
        if token.trim().is_empty() {
            return Err(validation::ValidationError::new("token", "is required").into());
        }
        let request = OutboundRequest::post(format!("/v1/customers/{customer_id}/cards"))
            .with_json(&CardBody { token })?;
        Ok(fetch::<_, _, WireCard>(self.pipeline, request).await?.into())
    }

    /// Lists a customer's saved cards.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed id, or any provider error.
    pub async fn list(&self, customer_id: &str) -> Result<Vec<Card>> {
        validation::resource_id("customer_id", customer_id)?;
        let request = OutboundRequest::get(format!("/v1/customers/{customer_id}/cards"));
        let cards: Option<Vec<WireCard>> = fetch(self.pipeline, request).await?;
        Ok(cards.unwrap_or_default().into_iter().map(Card::from).collect())
    }

    /// Removes a saved card.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed id, or any provider error.
    pub async fn remove(&self, customer_id: &str, card_id: &str) -> Result<()> {
        validation::resource_id("customer_id", customer_id)?;
        validation::resource_id("card_id", card_id)?;
        execute(
            self.pipeline,
            OutboundRequest::delete(format!("/v1/customers/{customer_id}/cards/{card_id}")),
        )
        .await
    }
}
