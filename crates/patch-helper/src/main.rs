mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use crate::commands::Commands;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "patch-helper")]
#[command(about = "Find overrides affected by a vendor upgrade patch", long_about = None)]
struct Cli {
    /// Log progress (info level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Log everything the checks do (debug level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    if let Err(e) = cli.command.execute() {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// `RUST_LOG` wins over the flags when set.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!(level, "logging initialized");
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
