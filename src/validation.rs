//! Field-level input validation.
//!
//! Checks run before a request is built; failures come back as a
//! [`ValidationError`] value naming the offending field.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// A caller-supplied field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {field}: {reason}")]
pub struct ValidationError {
    /// Name of the field, e.g. `payer.email`
    pub field: &'static str,
    /// Why the value was rejected
    pub reason: String,
}

impl ValidationError {
    /// Creates a validation error.
    #[must_use]
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Token prefix for production credentials.
pub const PRODUCTION_TOKEN_PREFIX: &str = "APP-USR";

/// Token prefix for sandbox credentials.
pub const SANDBOX_TOKEN_PREFIX: &str = "TEST-";

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Validates an access token's presence and prefix.
///
/// Sandbox tokens (`TEST-`) are accepted only when `sandbox` is set.
///
/// # Errors
///
/// Returns an error if the token is empty or has an unexpected prefix.
pub fn access_token(token: &str, sandbox: bool) -> Result<(), ValidationError> {
    if token.trim().is_empty() {
        return Err(ValidationError::new("token", "is required"));
    }
    if token.starts_with(PRODUCTION_TOKEN_PREFIX)
        || (sandbox && token.starts_with(SANDBOX_TOKEN_PREFIX))
    {
        return Ok(());
    }
    let reason = if sandbox {
        format!("must start with '{PRODUCTION_TOKEN_PREFIX}' or '{SANDBOX_TOKEN_PREFIX}'")
    } else {
        format!("must start with '{PRODUCTION_TOKEN_PREFIX}'")
    };
    Err(ValidationError::new("token", reason))
}

/// Validates a required email address.
///
/// # Errors
///
/// Returns an error if the email is missing or malformed.
pub fn email(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        None => Err(ValidationError::new(field, "is required")),
        Some(v) if v.trim().is_empty() => Err(ValidationError::new(field, "is required")),
        Some(v) if !EMAIL.is_match(v) => {
            Err(ValidationError::new(field, format!("'{v}' is not a valid email")))
        }
        Some(_) => Ok(()),
    }
}

/// Validates a strictly positive, finite amount.
///
/// # Errors
///
/// Returns an error if the amount is zero, negative, NaN or infinite.
pub fn positive_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new(field, "must be greater than 0"))
    }
}

/// Validates an optional callback URL: it must parse and use http or https.
///
/// # Errors
///
/// Returns an error if the URL is present but invalid.
pub fn callback_url(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    let Some(raw) = value else {
        return Ok(());
    };
    let url = url::Url::parse(raw)
        .map_err(|e| ValidationError::new(field, format!("'{raw}' is not a valid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ValidationError::new(
            field,
            format!("scheme '{scheme}' is not allowed, use http or https"),
        )),
    }
}

/// Validates an identifier that will be placed in a URL path segment.
///
/// Only ASCII letters, digits, `-` and `_` are allowed, so an identifier can
/// never change which endpoint is called.
///
/// # Errors
///
/// Returns an error if the identifier is empty or contains other characters.
pub fn resource_id(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    if value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            format!("'{value}' contains characters not allowed in an identifier"),
        ))
    }
}
