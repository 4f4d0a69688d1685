//! poetry-to-uv: convert a Poetry `pyproject.toml` into a uv (PEP 621) one.
//!
//! This crate provides the entry point for the `poetry-to-uv` binary and the
//! [`pyproject`] conversion library behind it. Poetry remains the source of
//! truth for versions: it is run once via `poetry export`, and every
//! declared dependency is pinned to what it reports.

#![deny(clippy::print_stdout, clippy::print_stderr)]

use std::ffi::OsString;
use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;
use crate::commands::ExitStatus;
use crate::printer::Printer;

pub mod cli;
pub mod commands;
pub mod logging;
pub mod printer;
pub mod pyproject;

/// Entry point for the poetry-to-uv CLI.
///
/// Parses CLI arguments, installs the diagnostic subscriber and runs the
/// conversion, printing any error chain to stderr.
pub fn main<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    logging::setup_logging(cli.verbose, cli.quiet);
    let printer = Printer::new(cli.quiet);

    match commands::convert::execute(&cli, printer) {
        Ok(status) => status.into(),
        Err(err) => {
            printer.error(&err);
            ExitStatus::Error.into()
        }
    }
}
