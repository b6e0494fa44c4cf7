//! CardGuard CLI entry point.
//!
//! Parses arguments, delegates to `commands::run`, and prints errors to
//! stderr with a non-zero exit code.

mod args;
mod commands;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    match commands::run(args::Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("cardguard: {err}");
            ExitCode::FAILURE
        }
    }
}
