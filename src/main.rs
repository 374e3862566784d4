//! Go autobuilder entry point.

use std::process::ExitCode;

use clap::Parser;
use go_autobuilder::cli::{Cli, CommandDispatcher};
use go_autobuilder::config::Config;
use go_autobuilder::diagnostics::default_sink;
use go_autobuilder::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("go_autobuilder=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("go_autobuilder=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<u8> {
    let config = Config::from_env()?;
    let working_dir = std::env::current_dir()?;
    let mut sink = default_sink(config.diagnostic_dir.as_deref());

    let dispatcher = CommandDispatcher::new(config, working_dir);
    let result = dispatcher.dispatch(cli, &mut sink)?;
    Ok(result.exit_status())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Autobuilder starting with args: {:?}", cli);

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(1)
        }
    }
}
