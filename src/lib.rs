//! MercadoPago REST API client.
//!
//! A typed client for payments, customers, subscriptions, checkout orders
//! and installment lookups, built around a resilient request pipeline:
//! mutating calls carry an idempotency key that stays fixed across
//! retries, transient failures are retried with linear backoff, and every
//! failure surfaces as a uniform [`ProviderError`](pipeline::ProviderError).
//! Inbound webhooks are authenticated with HMAC-SHA256 before decoding.
//!
//! # Example
//!
//! ```no_run
//! use mercadopago::resources::CreatePayment;
//! use mercadopago::{ClientOptions, MercadoPago};
//!
//! # async fn demo() -> Result<(), mercadopago::Error> {
//! let client = MercadoPago::new(ClientOptions::new("APP-USR-...").with_webhook_secret("secret"))?;
//!
//! let payment = client
//!     .payments()
//!     .create(&CreatePayment::new(99.90, "pix", "buyer@example.com"))
//!     .await?;
//! println!("{} {:?}", payment.status, payment.qr_code);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod resources;
pub mod time;
pub mod transport;
pub mod validation;
pub mod webhook;
pub mod wire;

#[cfg(test)]
mod test_fixtures;

pub use client::{ClientOptions, MercadoPago};
pub use error::{Error, Result};
