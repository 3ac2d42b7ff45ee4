//! `mercadopago`: inspect payments and check webhook deliveries from a shell.

use std::process::ExitCode;

use mercadopago::config::{Cli, Command, ConfigError, ValidatedConfig};

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => return config_failure(&e),
    };

    setup_tracing(config.verbose);
    tracing::debug!("{config}");

    dispatch(&config, cli.command)
}

fn config_failure(error: &ConfigError) -> ExitCode {
    eprintln!("config error: {error}");
    print_config_hint(error);
    exit_code::CONFIG_ERROR
}

#[cfg(not(tarpaulin_include))]
fn dispatch(config: &ValidatedConfig, command: Command) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: cannot start async runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(run::execute(config, command)) {
        Ok(output) => {
            println!("{output}");
            exit_code::SUCCESS
        }
        Err(run::RunError::Config(e)) => config_failure(&e),
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            exit_code::runtime_error()
        }
    }
}
