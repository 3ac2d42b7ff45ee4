//! Command-line flags and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// MercadoPago command-line client
///
/// Looks up payments and installment plans, and verifies webhook
/// deliveries offline.
#[derive(Debug, Parser)]
#[command(name = "mercadopago")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Access token (`APP-USR-...`, or `TEST-...` with --sandbox)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Accept sandbox credentials
    #[arg(long, global = true)]
    pub sandbox: bool,

    /// API base URL
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Maximum number of retries after the first attempt
    #[arg(long = "retry-max", global = true)]
    pub retry_max: Option<u32>,

    /// Retry delay unit in milliseconds (retry n waits n times this)
    #[arg(long = "retry-delay-ms", global = true)]
    pub retry_delay_ms: Option<u64>,

    /// Secret for webhook signature verification
    #[arg(long = "webhook-secret", global = true)]
    pub webhook_secret: Option<String>,

    /// TOML file with `[client]`, `[retry]` and `[webhook]` sections
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Write a commented config template
    Init {
        /// Where to write it
        #[arg(long, short, default_value = "mercadopago.toml")]
        output: PathBuf,
    },

    /// Verify and decode a webhook delivery saved to a file
    Verify {
        /// File holding the raw request body
        #[arg(long)]
        body: PathBuf,

        /// Value of the `x-signature` header
        #[arg(long)]
        signature: Option<String>,

        /// Value of the `x-request-id` header
        #[arg(long = "request-id")]
        request_id: Option<String>,

        /// Decode without checking the signature
        #[arg(long = "skip-verification")]
        skip_verification: bool,
    },

    /// Fetch a payment by id
    Payment {
        /// Payment id
        id: String,
    },

    /// List installment plans for an amount and card BIN
    Installments {
        /// Purchase amount
        #[arg(long)]
        amount: f64,

        /// First 6 to 8 digits of the card number
        #[arg(long)]
        bin: String,

        /// Currency id (default: BRL)
        #[arg(long)]
        currency: Option<String>,
    },
}

impl Cli {
    /// Reads `std::env::args`, exiting with usage on error.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Like [`Cli::parse_args`] but from an explicit argv.
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }

    /// Returns true if the command calls the API and so needs a token.
    #[must_use]
    pub const fn needs_token(&self) -> bool {
        matches!(
            self.command,
            Command::Payment { .. } | Command::Installments { .. }
        )
    }
}
