//! User-facing output for poetry-to-uv.
//!
//! The converted document goes to stdout; everything the [`Printer`] emits
//! goes to stderr so that `poetry-to-uv pyproject.toml > out.toml` stays
//! clean. `--quiet` silences everything except errors.

use anstream::eprintln;
use owo_colors::OwoColorize;

use crate::pyproject::Unresolved;

/// Controls whether messages are emitted to stderr.
#[derive(Copy, Clone)]
pub struct Printer {
    /// Whether non-error output is suppressed.
    quiet: bool,
}

impl Printer {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print an informational message to stderr.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }

    /// Print a warning message to stderr.
    pub fn warn(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}: {}", "warning".yellow().bold(), message);
        }
    }

    /// Warn about a dependency that will be written unpinned.
    pub fn unresolved(&self, unresolved: &Unresolved) {
        self.warn(&format!(
            "Failed to resolve dependency for `{}` in {}",
            unresolved.name, unresolved.section
        ));
    }

    /// Print an error and its chain of causes to stderr.
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, err: &anyhow::Error) {
        let mut causes = err.chain();
        if let Some(message) = causes.next() {
            eprintln!("{}: {}", "error".red().bold(), message);
        }
        for cause in causes {
            eprintln!(
                "  {}: {}",
                "Caused by".red().bold(),
                cause.to_string().trim()
            );
        }
    }
}
