//! Rewrite a Poetry `pyproject.toml` document into PEP 621 form.
//!
//! The document is edited in place with `toml_edit`, so comments and layout
//! outside the rewritten sections survive. `[tool.poetry]` becomes
//! `[project]`, Poetry-only keys are dropped, and the dependency sections
//! are replaced with pinned requirement arrays.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use toml_edit::{Array, DocumentMut, Item, Table, Value, value};
use tracing::{debug, warn};

use crate::pyproject::model::SchemaError;
use crate::pyproject::remap::{PinnedDependencies, Remapped};

/// Keys of `[tool.poetry]` that have no `[project]` counterpart.
const POETRY_ONLY_KEYS: &[&str] = &["source", "group", "extras", "dev-dependencies"];

/// Indentation for one requirement per line, matching uv's own output.
const ARRAY_INDENT: &str = "\n    ";

/// Write the document to a file.
pub fn write_document(document: &DocumentMut, path: &Path) -> Result<()> {
    fs_err::write(path, document.to_string())?;
    Ok(())
}

/// Write the document to the given stream.
pub fn print_document(document: &DocumentMut, mut out: impl Write) -> Result<()> {
    out.write_all(document.to_string().as_bytes())
        .context("Failed to write pyproject.toml to stdout")?;
    out.flush()?;
    Ok(())
}

/// Move `[tool.poetry]` to `[project]` and write the pinned dependencies.
pub fn poetry_to_project(
    document: &mut DocumentMut,
    remapped: &Remapped,
) -> Result<(), SchemaError> {
    let (poetry, tool_is_empty) = {
        let tool = document
            .get_mut("tool")
            .and_then(Item::as_table_like_mut)
            .ok_or(SchemaError::MissingTable("tool"))?;
        let poetry = tool
            .remove("poetry")
            .ok_or(SchemaError::MissingTable("tool.poetry"))?;
        (poetry, tool.is_empty())
    };
    if tool_is_empty {
        debug!("Removing empty `[tool]` table");
        document.remove("tool");
    }

    let mut project = poetry
        .into_table()
        .map_err(|_| SchemaError::NotATable("tool.poetry"))?;
    project.set_implicit(false);
    // An implicit `[tool.poetry]` has no position of its own.
    if project.position().is_none() {
        let first_subtable = project
            .iter()
            .filter_map(|(_, item)| item.as_table())
            .filter_map(Table::position)
            .min();
        if let Some(position) = first_subtable {
            project.set_position(Some(position));
        }
    }

    for key in POETRY_ONLY_KEYS {
        if project.remove(key).is_some() {
            debug!("Removed `tool.poetry.{key}`");
        }
    }

    project.remove("dependencies");
    project.insert("dependencies", value(requirements_array(&remapped.main)));

    project.remove("optional-dependencies");
    project.insert(
        "optional-dependencies",
        Item::Table(optional_dependencies(remapped)),
    );

    document.insert("project", Item::Table(project));
    Ok(())
}

/// Merge groups and extras into one `[project.optional-dependencies]` table.
///
/// Groups are written first, then extras. A name used by both keeps the
/// extras bucket.
fn optional_dependencies(remapped: &Remapped) -> Table {
    let mut table = Table::new();
    for (name, pinned) in remapped.groups.iter().chain(&remapped.extras) {
        if table
            .insert(name, value(requirements_array(pinned)))
            .is_some()
        {
            warn!("Optional dependency group `{name}` is defined as both a group and an extra");
        }
    }
    table
}

/// A multi-line array with one `name == version` requirement per line.
fn requirements_array(pinned: &PinnedDependencies) -> Array {
    let mut array = Array::new();
    for requirement in pinned.requirements() {
        let mut requirement = Value::from(requirement);
        requirement.decor_mut().set_prefix(ARRAY_INDENT);
        array.push_formatted(requirement);
    }
    if !array.is_empty() {
        array.set_trailing_comma(true);
        array.set_trailing("\n");
    }
    array
}
