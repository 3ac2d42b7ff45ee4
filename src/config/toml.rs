//! Shape of `mercadopago.toml`.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// The whole file. Every key may be left out; flags fill the gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// `[client]`
    #[serde(default)]
    pub client: ClientSection,

    /// `[retry]`
    #[serde(default)]
    pub retry: RetrySection,

    /// `[webhook]`
    #[serde(default)]
    pub webhook: WebhookSection,
}

/// Credentials and endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Access token
    pub token: Option<String>,

    /// Accept sandbox credentials
    #[serde(default)]
    pub sandbox: bool,

    /// API base URL
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

/// Backoff for network errors and 5xx answers.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Retries after the first attempt
    pub max_retries: Option<u32>,

    /// Delay unit in milliseconds
    pub base_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Shared secret for `x-signature` verification
    pub secret: Option<String>,
}

impl TomlConfig {
    /// # Errors
    ///
    /// [`ConfigError::FileRead`] or [`ConfigError::TomlParse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        std::fs::read_to_string(path)
            .map_err(|source| ConfigError::FileRead {
                path: path.to_owned(),
                source,
            })
            .and_then(|text| Self::parse(&text))
    }

    /// # Errors
    ///
    /// [`ConfigError::TomlParse`], including for unknown keys.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// What `mercadopago init` writes: every key, commented out where a
/// default applies.
#[must_use]
pub fn default_config_template() -> String {
    r#"# MercadoPago client configuration

[client]
# Access token (required for API commands)
# Production tokens start with APP-USR; TEST- tokens need sandbox = true
# token = "APP-USR-..."

# Accept sandbox credentials
# sandbox = false

# API base URL (default: https://api.mercadopago.com)
# base_url = "https://api.mercadopago.com"

# Request timeout in seconds (default: 10)
timeout = 10

[retry]
# Retries after the first attempt on network errors and 5xx (default: 2)
# max_retries = 2

# Delay unit in milliseconds; retry n waits n times this (default: 300)
# base_delay_ms = 300

[webhook]
# Secret used to verify the x-signature header of deliveries
# When set, unsigned deliveries are rejected
# secret = "your-webhook-secret"
"#
    .to_string()
}
