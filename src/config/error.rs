//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Anything that stops the CLI from turning flags and a TOML file into a
/// usable [`ValidatedConfig`](super::ValidatedConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file named by `--config` could not be read.
    #[error("cannot read config '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not a valid config document.
    #[error("config is not valid TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// `init` could not write the template.
    #[error("cannot write config '{}': {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value no layer supplied.
    #[error("{field} is required. {hint}")]
    MissingRequired {
        field: &'static str,
        hint: &'static str,
    },

    /// The API base URL did not parse or used another scheme.
    #[error("base URL '{url}' rejected: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A timeout or delay that cannot be used.
    #[error("{field} {reason}")]
    InvalidDuration {
        field: &'static str,
        reason: String,
    },

    /// Rejected by the client's own checks (token prefix and so on).
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Field names carried by [`ConfigError::MissingRequired`].
pub mod field {
    pub const TOKEN: &str = "token";
}

impl ConfigError {
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
