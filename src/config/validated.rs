//! Flags and file merged into one checked value.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::client::ClientOptions;
use crate::pipeline::RetryPolicy;
use crate::validation;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

const TOKEN_HINT: &str = "Use --token or set client.token in config file";

/// Everything the binary needs, already checked.
///
/// `Debug` and `Display` both print a summary that never includes the token
/// or the webhook secret.
#[derive(Clone)]
pub struct ValidatedConfig {
    /// Access token; required only by commands that call the API
    pub token: Option<String>,

    /// Whether sandbox credentials are accepted
    pub sandbox: bool,

    /// API base URL
    pub base_url: Url,

    /// Per-request timeout
    pub timeout: Duration,

    /// Retry policy for provider calls
    pub retry_policy: RetryPolicy,

    /// Webhook signing secret
    pub webhook_secret: Option<String>,

    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ base_url: {}, sandbox: {}, timeout: {}s, retry: {}x/{}ms, token: {}, \
             webhook_secret: {} }}",
            self.base_url,
            self.sandbox,
            self.timeout.as_secs(),
            self.retry_policy.max_retries,
            self.retry_policy.base_delay.as_millis(),
            if self.token.is_some() { "set" } else { "none" },
            if self.webhook_secret.is_some() { "set" } else { "none" },
        )
    }
}

impl fmt::Debug for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl ValidatedConfig {
    /// Merges `cli` over `toml` over [`defaults`].
    ///
    /// # Errors
    ///
    /// - The command calls the API and no token is configured
    /// - The token has an unexpected prefix
    /// - The base URL is invalid
    /// - The timeout is zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        // Flags only enable: true in either source wins
        let sandbox = cli.sandbox || toml.is_some_and(|t| t.client.sandbox);

        let token = Self::resolve_token(cli, toml, sandbox)?;
        if token.is_none() && cli.needs_token() {
            return Err(ConfigError::missing(field::TOKEN, TOKEN_HINT));
        }

        let base_url = Self::resolve_base_url(cli, toml)?;
        let timeout = Self::resolve_timeout(cli, toml)?;
        let retry_policy = Self::build_retry_policy(cli, toml);

        let webhook_secret = cli
            .webhook_secret
            .clone()
            .or_else(|| toml.and_then(|t| t.webhook.secret.clone()))
            .filter(|s| !s.is_empty());

        Ok(Self {
            token,
            sandbox,
            base_url,
            timeout,
            retry_policy,
            webhook_secret,
            verbose: cli.verbose,
        })
    }

    /// [`ValidatedConfig::from_raw`] after reading `--config`, if given.
    ///
    /// `init` never reads the file: it is the command that creates it.
    ///
    /// # Errors
    ///
    /// File errors from [`TomlConfig::load`], then anything `from_raw` rejects.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match cli.config.as_deref() {
            Some(path) if !cli.is_init() => Some(TomlConfig::load(path)?),
            _ => None,
        };
        Self::from_raw(cli, file.as_ref())
    }

    /// Builds client options from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if no token is configured.
    pub fn client_options(&self) -> Result<ClientOptions, ConfigError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| ConfigError::missing(field::TOKEN, TOKEN_HINT))?;

        let mut options = ClientOptions::new(token)
            .with_sandbox(self.sandbox)
            .with_timeout(self.timeout)
            .with_retry_policy(self.retry_policy)
            .with_base_url(self.base_url.as_str());
        options.webhook_secret.clone_from(&self.webhook_secret);
        Ok(options)
    }

    fn resolve_token(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        sandbox: bool,
    ) -> Result<Option<String>, ConfigError> {
        let token = cli
            .token
            .clone()
            .or_else(|| toml.and_then(|t| t.client.token.clone()))
            .filter(|t| !t.is_empty());

        if let Some(ref token) = token {
            validation::access_token(token, sandbox)?;
        }
        Ok(token)
    }

    fn resolve_base_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = cli
            .base_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.client.base_url.as_deref()))
            .unwrap_or(defaults::BASE_URL);

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: format!("scheme '{scheme}' is not supported"),
            }),
        }
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.client.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn build_retry_policy(cli: &Cli, toml: Option<&TomlConfig>) -> RetryPolicy {
        let retry = toml.map(|t| &t.retry);

        // Zero is allowed for both and disables retries or delays.
        let max_retries = cli
            .retry_max
            .or_else(|| retry.and_then(|r| r.max_retries))
            .unwrap_or(defaults::RETRY_MAX_RETRIES);

        let base_delay_ms = cli
            .retry_delay_ms
            .or_else(|| retry.and_then(|r| r.base_delay_ms))
            .unwrap_or(defaults::RETRY_BASE_DELAY_MS);

        RetryPolicy::new()
            .with_max_retries(max_retries)
            .with_base_delay(Duration::from_millis(base_delay_ms))
    }
}

/// Backs `mercadopago init`. Overwrites an existing file.
///
/// # Errors
///
/// [`ConfigError::FileWrite`].
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, super::toml::default_config_template()).map_err(|source| {
        ConfigError::FileWrite {
            path: path.to_owned(),
            source,
        }
    })
}
