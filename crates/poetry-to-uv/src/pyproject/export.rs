//! Exporting resolved versions from Poetry.
//!
//! Poetry owns resolution. We run `poetry export` once with every extra and
//! group enabled and read back the requirements it prints, one
//! `name==version` (or `name @ url`) per line, optionally followed by a
//! `; marker`. The result is a flat [`ResolvedDependencies`] mapping keyed by
//! [`CanonicalName`].

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, trace};

use crate::pyproject::normalize::{CanonicalName, NameError};

/// The resolver program used when none is configured.
pub const DEFAULT_RESOLVER: &str = "poetry";

/// Arguments that make `poetry export` print plain pinned requirements.
const EXPORT_ARGS: &[&str] = &["export", "--format=requirements.txt", "--without-hashes"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to run `{program}`")]
    Spawn {
        program: String,
        #[source]
        err: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("`{0}` produced no output")]
    EmptyOutput(String),

    #[error("Resolver output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Couldn't parse the dependency strategy delimiter in line `{0}`")]
    UnparseableLine(String),

    #[error("Invalid dependency name in line `{line}`")]
    InvalidName {
        line: String,
        #[source]
        err: NameError,
    },
}

/// Exact versions by canonical dependency name, as reported by the resolver.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDependencies(FxHashMap<CanonicalName, String>);

impl ResolvedDependencies {
    pub fn get(&self, name: &CanonicalName) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: CanonicalName, version: String) {
        self.0.insert(name, version);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V: Into<String>> FromIterator<(CanonicalName, V)> for ResolvedDependencies {
    fn from_iter<I: IntoIterator<Item = (CanonicalName, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, version)| (name, version.into()))
                .collect(),
        )
    }
}

/// Builds and runs the `poetry export` invocation for one project.
#[derive(Debug, Clone)]
pub struct PoetryExporter {
    program: PathBuf,
    project_dir: PathBuf,
    extras: Vec<String>,
    groups: Vec<String>,
}

impl PoetryExporter {
    /// Create an exporter running `program` against the project in `project_dir`.
    pub fn new(program: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            project_dir: project_dir.into(),
            extras: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Enable the given extras (`--extras <name>` each).
    #[must_use]
    pub fn with_extras<I, S>(mut self, extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extras.extend(extras.into_iter().map(Into::into));
        self
    }

    /// Enable the given dependency groups (`--with <name>` each).
    #[must_use]
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// The argument vector passed to the resolver program.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = EXPORT_ARGS.iter().map(OsString::from).collect();
        for extra in &self.extras {
            args.push("--extras".into());
            args.push(extra.into());
        }
        for group in &self.groups {
            args.push("--with".into());
            args.push(group.into());
        }
        let mut directory = OsString::from("--directory=");
        directory.push(&self.project_dir);
        args.push(directory);
        args
    }

    /// Run the resolver and parse its output.
    ///
    /// Blocks until the resolver exits; there is no timeout.
    pub fn export(&self) -> Result<ResolvedDependencies, ExportError> {
        let program = self.program.display().to_string();
        let args = self.args();
        debug!(
            "Running `{program} {}`",
            args.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|err| ExportError::Spawn {
                program: program.clone(),
                err,
            })?;

        if !output.status.success() {
            return Err(ExportError::Failed {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        if output.stdout.is_empty() {
            return Err(ExportError::EmptyOutput(program));
        }

        let resolved = parse_export_output(output.stdout)?;
        debug!("Resolved {} pinned dependencies", resolved.len());
        Ok(resolved)
    }
}

/// Parse the requirements printed by `poetry export`.
pub fn parse_export_output(output: Vec<u8>) -> Result<ResolvedDependencies, ExportError> {
    let output = String::from_utf8(output)?;
    let mut resolved = ResolvedDependencies::default();
    for line in output.lines() {
        if let Some((name, version)) = parse_export_line(line)? {
            trace!("{name} resolved to {version}");
            resolved.insert(name, version);
        }
    }
    Ok(resolved)
}

/// Parse a single export line, skipping blanks, comments and pip options.
fn parse_export_line(line: &str) -> Result<Option<(CanonicalName, String)>, ExportError> {
    let requirement = line
        .split_once(';')
        .map_or(line, |(requirement, _marker)| requirement)
        .trim();

    if requirement.is_empty() || requirement.starts_with('#') || requirement.starts_with('-') {
        return Ok(None);
    }

    let (name, version) = requirement
        .split_once('@')
        .or_else(|| requirement.split_once("=="))
        .ok_or_else(|| ExportError::UnparseableLine(line.trim().to_owned()))?;

    let name = name
        .parse::<CanonicalName>()
        .map_err(|err| ExportError::InvalidName {
            line: line.trim().to_owned(),
            err,
        })?;

    Ok(Some((name, version.trim().to_owned())))
}
