//! The conversion pipeline behind `poetry-to-uv <PYPROJECT_PATH>`.
//!
//! Load the manifest, export resolved versions from Poetry, remap, write.

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::Cli;
use crate::commands::ExitStatus;
use crate::printer::Printer;
use crate::pyproject::writer::{print_document, write_document};
use crate::pyproject::{PoetryManifest, find_pyproject, project_root};

/// Execute the conversion.
pub fn execute(cli: &Cli, printer: Printer) -> Result<ExitStatus> {
    let pyproject_path = find_pyproject(&cli.pyproject_path)?;
    let project_dir = project_root(&pyproject_path)?;
    debug!("Converting `{}`", pyproject_path.display());

    let manifest = PoetryManifest::from_path(&pyproject_path)?;

    let resolved = manifest
        .exporter(&cli.poetry, &project_dir)
        .export()
        .context("Failed to export resolved dependencies from Poetry")?;

    let conversion = manifest.into_uv(&resolved)?;
    for unresolved in &conversion.unresolved {
        printer.unresolved(unresolved);
    }

    match cli.output_path(&pyproject_path) {
        Some(output_path) => {
            write_document(&conversion.document, output_path)?;
            printer.info(&format!(
                "Wrote uv pyproject.toml to `{}`",
                output_path.display()
            ));
        }
        None => print_document(&conversion.document, anstream::stdout())?,
    }

    Ok(ExitStatus::Success)
}
