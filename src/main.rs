//! # lolp
//!
//! Command-line client for Lolipop! Managed Cloud.
//!
//! ```bash
//! # Authenticate and export the token for later calls
//! eval "$(lolp login --username you@example.com)"
//!
//! # Create a WordPress project
//! lolp project create --kind wordpress --wp-username admin --wp-password secret --wp-email you@example.com
//!
//! # List projects
//! lolp project list
//! ```

use std::process::ExitCode;

use clap::Parser;
use lolp::{commands, logger, Cli};

/// Parses arguments, installs the logger, and runs the command.
/// Any failure is printed to stderr and turns into exit code 1.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logger::initialize(cli.loglevel) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    let Some(cmd) = cli.cmd else {
        eprintln!("No command provided. Use --help to see available commands.");
        return ExitCode::FAILURE;
    };

    match commands::run(cmd).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
