//! CLI argument definitions for poetry-to-uv.

use std::path::{Path, PathBuf};

use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

use crate::pyproject::export::DEFAULT_RESOLVER;

/// Clap v3-style help menu colors, matching uv's convention.
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Convert a Poetry pyproject.toml into a uv (PEP 621) pyproject.toml.
#[derive(Parser, Debug)]
#[command(
    name = "poetry-to-uv",
    author,
    version,
    about = "Convert a Poetry pyproject.toml into a uv (PEP 621) pyproject.toml.",
    long_about = "Convert a Poetry pyproject.toml into a uv (PEP 621) pyproject.toml, also \
        usable by pip and pip-compile.\n\nEvery dependency is pinned to the exact version \
        Poetry currently resolves it to, so uv starts from the same versions.",
    styles = STYLES,
    after_help = "Poetry must be installed (with `poetry export` available) to resolve versions."
)]
pub struct Cli {
    /// Path to the Poetry pyproject.toml file, or the directory containing it.
    pub pyproject_path: PathBuf,

    /// Write the converted pyproject.toml to this file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Overwrite the input pyproject.toml with the converted result.
    #[arg(short, long, conflicts_with = "output_file")]
    pub in_place: bool,

    /// The Poetry executable used to export resolved versions.
    #[arg(long, value_name = "PATH", env = "POETRY_TO_UV_POETRY", default_value = DEFAULT_RESOLVER)]
    pub poetry: PathBuf,

    /// Increase logging verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Where the converted document goes: a file, or `None` for stdout.
    pub fn output_path<'a>(&'a self, pyproject_path: &'a Path) -> Option<&'a Path> {
        if self.in_place {
            Some(pyproject_path)
        } else {
            self.output_file.as_deref()
        }
    }
}
