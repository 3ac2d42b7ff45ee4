//! Process-level helpers for the CLI: exit codes, hints and log setup.

use mercadopago::config::{ConfigError, field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Exit statuses reported by the `mercadopago` binary.
pub mod exit_code {
    use std::process::ExitCode;

    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Bad flags, unreadable config, missing or malformed token.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// The API call, the webhook check or the output failed.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

const INIT_HINT: &str = "hint: `mercadopago init` writes a config template you can fill in";

/// Points the user at `init` when the failure looks like a first run.
pub fn print_config_hint(error: &ConfigError) {
    let first_run = match error {
        ConfigError::MissingRequired { field: name, .. } => *name == field::TOKEN,
        ConfigError::FileRead { .. } => true,
        _ => false,
    };
    if first_run {
        eprintln!("\n{INIT_HINT}");
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default level.
///
/// Everything goes to stderr; stdout carries only command output.
pub fn setup_tracing(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
