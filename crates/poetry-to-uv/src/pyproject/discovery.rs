//! Locate the `pyproject.toml` to convert and the project it belongs to.
//!
//! The CLI accepts either the manifest itself or the directory holding it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// The filename we're looking for when given a directory.
const PYPROJECT_NAME: &str = "pyproject.toml";

/// Resolve the manifest path from a file or directory argument.
pub fn find_pyproject(path: &Path) -> Result<PathBuf> {
    let candidate = if path.is_dir() {
        path.join(PYPROJECT_NAME)
    } else {
        path.to_path_buf()
    };

    if candidate.is_file() {
        return Ok(candidate);
    }

    bail!("No `{PYPROJECT_NAME}` found at `{}`", path.display());
}

/// Return the absolute project root (parent of the manifest).
///
/// Poetry is pointed at this directory with `--directory`.
pub fn project_root(pyproject_path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(pyproject_path)
        .with_context(|| format!("Failed to resolve `{}`", pyproject_path.display()))?;
    absolute
        .parent()
        .map(Path::to_path_buf)
        .with_context(|| format!("`{}` has no parent directory", absolute.display()))
}
