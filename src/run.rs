//! Command execution.
//!
//! Each subcommand yields a JSON document (or a short message) that the
//! entry point prints to stdout. API commands share one client per run.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use mercadopago::MercadoPago;
use mercadopago::config::{Command, ConfigError, ValidatedConfig, write_default_config};
use mercadopago::resources::InstallmentQuery;
use mercadopago::time::Sleeper;
use mercadopago::transport::HttpClient;
use mercadopago::webhook::WebhookParser;

/// Error type for command execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configuration cannot serve this command.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The client rejected input or the provider call failed.
    #[error(transparent)]
    Client(#[from] mercadopago::Error),

    /// Failed to read the saved webhook body.
    #[error("Failed to read webhook body '{}': {source}", path.display())]
    BodyRead {
        /// Path to the body file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to encode the result for output.
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Executes one subcommand and returns what should be printed.
///
/// # Errors
///
/// Returns an error if the configuration lacks what the command needs, the
/// webhook body cannot be read or verified, or the provider call fails.
///
/// # Coverage Note
///
/// API commands build a real `reqwest` client here; the command logic
/// itself is covered through [`fetch_payment`] and [`list_installments`].
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: &ValidatedConfig, command: Command) -> Result<String, RunError> {
    match command {
        Command::Init { output } => {
            write_default_config(&output)?;
            Ok(format!(
                "Configuration template written to: {}",
                output.display()
            ))
        }
        Command::Verify {
            body,
            signature,
            request_id,
            skip_verification,
        } => {
            let parser = WebhookParser::new(config.webhook_secret.clone());
            verify_delivery(
                &parser,
                &body,
                signature.as_deref(),
                request_id.as_deref(),
                skip_verification,
            )
        }
        Command::Payment { id } => {
            let client = MercadoPago::new(config.client_options()?)?;
            fetch_payment(&client, &id).await
        }
        Command::Installments {
            amount,
            bin,
            currency,
        } => {
            let client = MercadoPago::new(config.client_options()?)?;
            let query = InstallmentQuery {
                amount,
                bin,
                currency,
            };
            list_installments(&client, &query).await
        }
    }
}

/// Reads a saved delivery body, authenticates it and renders the event.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the signature is missing or
/// wrong (unless skipped), or the body is not a valid event.
pub fn verify_delivery(
    parser: &WebhookParser,
    body: &Path,
    signature: Option<&str>,
    request_id: Option<&str>,
    skip_verification: bool,
) -> Result<String, RunError> {
    let raw = std::fs::read(body).map_err(|e| RunError::BodyRead {
        path: body.to_path_buf(),
        source: e,
    })?;

    let event = if skip_verification {
        parser.parse_unverified(&raw)
    } else {
        parser.parse(&raw, signature, request_id)
    }
    .map_err(mercadopago::Error::from)?;

    tracing::info!(topic = %event.topic, resource_id = %event.resource_id, "Webhook event decoded");
    render(&event)
}

/// Fetches a payment and renders it.
///
/// # Errors
///
/// Returns an error if the id is malformed or the provider call fails.
pub async fn fetch_payment<H: HttpClient, S: Sleeper>(
    client: &MercadoPago<H, S>,
    id: &str,
) -> Result<String, RunError> {
    let payment = client.payments().get(id).await?;
    render(&payment)
}

/// Fetches installment plans and renders them.
///
/// # Errors
///
/// Returns an error if the query is invalid or the provider call fails.
pub async fn list_installments<H: HttpClient, S: Sleeper>(
    client: &MercadoPago<H, S>,
    query: &InstallmentQuery,
) -> Result<String, RunError> {
    let options = client.installments().get(query).await?;
    render(&options)
}

fn render<T: Serialize + ?Sized>(value: &T) -> Result<String, RunError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
