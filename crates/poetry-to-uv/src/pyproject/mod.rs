//! Poetry `pyproject.toml` parsing and conversion to PEP 621.
//!
//! ## Architecture
//!
//! A [`PoetryManifest`] holds the same file twice: as an editable
//! `toml_edit` document and as a validated [`PoetryConfig`]. Conversion maps:
//!
//! - `[tool.poetry]` -> `[project]`
//! - `[tool.poetry.dependencies]` -> `[project] dependencies`
//! - `[tool.poetry.group.*]` and `[tool.poetry.extras]` ->
//!   `[project.optional-dependencies]`
//!
//! with every requirement pinned to the version `poetry export` reports
//! (see [`export::PoetryExporter`]).

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use toml_edit::DocumentMut;

pub mod discovery;
pub mod export;
pub mod model;
pub mod normalize;
pub mod remap;
pub mod writer;

pub use discovery::{find_pyproject, project_root};
pub use export::{PoetryExporter, ResolvedDependencies};
pub use model::{PoetryConfig, SchemaError};
pub use normalize::{CanonicalName, NameError};
pub use remap::{Remapped, Unresolved};

/// A loaded Poetry manifest.
#[derive(Debug, Clone)]
pub struct PoetryManifest {
    document: DocumentMut,
    config: PoetryConfig,
}

/// The result of converting a [`PoetryManifest`].
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The PEP 621 document.
    pub document: DocumentMut,
    /// Declared dependencies the resolver did not report a version for.
    pub unresolved: Vec<Unresolved>,
}

impl FromStr for PoetryManifest {
    type Err = SchemaError;

    /// Parse and validate a manifest.
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let document = content.parse::<DocumentMut>()?;
        let config = content.parse::<PoetryConfig>()?;
        Ok(Self { document, config })
    }
}

impl PoetryManifest {
    /// Read, parse and validate the manifest at the given path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)?;
        Self::from_str(&content).with_context(|| format!("Failed to parse `{}`", path.display()))
    }

    pub fn config(&self) -> &PoetryConfig {
        &self.config
    }

    /// An exporter with every extra and group of this manifest enabled.
    pub fn exporter(&self, program: &Path, project_dir: &Path) -> PoetryExporter {
        PoetryExporter::new(program, project_dir)
            .with_extras(self.config.extras().keys().cloned())
            .with_groups(self.config.groups().keys().cloned())
    }

    /// Pin every dependency and rewrite the document into PEP 621 form.
    pub fn into_uv(self, resolved: &ResolvedDependencies) -> Result<Conversion, SchemaError> {
        let Self {
            mut document,
            config,
        } = self;
        let remapped = Remapped::new(&config, resolved);
        writer::poetry_to_project(&mut document, &remapped)?;
        Ok(Conversion {
            document,
            unresolved: remapped.unresolved,
        })
    }
}
