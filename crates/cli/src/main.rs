//! flagenv CLI - inspect how flag names map to configuration keys.
//!
//! Responsibilities:
//! - Parse command-line arguments.
//! - Show the key a loader derives for each flag name.
//! - Resolve flag values from the environment or a `.env` file.
//!
//! Does NOT handle:
//! - Key derivation or lookup logic itself (see `crates/flagenv`).
//!
//! Invariants:
//! - Results go to stdout; logs and errors go to stderr.

mod args;
mod commands;
mod dispatch;
mod error;
mod formatters;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run_command(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(e.exit_code().as_i32());
    }
    std::process::exit(ExitCode::Success.as_i32());
}
