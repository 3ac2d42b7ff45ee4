//! Settings for the `mercadopago` binary.
//!
//! Flags ([`Cli`]) and an optional TOML file ([`TomlConfig`]) are merged into
//! a [`ValidatedConfig`], which hands the library a
//! [`ClientOptions`](crate::ClientOptions). `init` writes a commented
//! template with [`write_default_config`].
//!
//! A value given on the command line beats the file, and the file beats
//! [`defaults`]. `--sandbox` is the exception: it is on if either layer
//! turns it on.
//!
//! There is no default access token. Only the commands that reach the API
//! (`payment`, `installments`) insist on one; `verify` runs offline.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
