//! Data model types for the Poetry sections of a `pyproject.toml`.
//!
//! Deserialization happens in two steps. Serde reads the raw shape
//! (`tool.poetry.dependencies`, `tool.poetry.group.*`, `tool.poetry.extras`),
//! then validation turns every declaration into a
//! [`DeclaredDependency`] and rejects shapes Poetry itself would not accept.
//! Everything downstream works on the validated types only.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use uv_normalize::{ExtraName, InvalidNameError, PackageName};

use crate::pyproject::normalize::{CanonicalName, join_sorted};

/// The interpreter constraint Poetry keeps alongside real dependencies.
const PYTHON: &str = "python";

/// The group name legacy `[tool.poetry.dev-dependencies]` maps onto.
const LEGACY_DEV_GROUP: &str = "dev";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Document(#[from] toml_edit::TomlError),

    #[error("Missing `[{0}]` table; is this a Poetry project?")]
    MissingTable(&'static str),

    #[error("`[{0}]` is not a table")]
    NotATable(&'static str),

    #[error("Unknown dependency version for `{name}`: `{value}`")]
    UnsupportedDependency { name: String, value: String },

    #[error("Invalid dependency name `{name}`")]
    InvalidName {
        name: String,
        #[source]
        err: InvalidNameError,
    },
}

/// Top-level `pyproject.toml` structure, as far as Poetry is concerned.
#[derive(Debug, Deserialize)]
struct RawPyProject {
    tool: Option<RawTool>,
}

#[derive(Debug, Deserialize)]
struct RawTool {
    poetry: Option<RawPoetryConfig>,
}

/// `[tool.poetry]`. Metadata keys are carried over verbatim by the writer,
/// so only the dependency namespaces are modelled here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawPoetryConfig {
    #[serde(default)]
    dependencies: BTreeMap<String, PoetryDependency>,

    #[serde(default)]
    dev_dependencies: BTreeMap<String, PoetryDependency>,

    #[serde(default)]
    group: BTreeMap<String, RawPoetryGroup>,

    #[serde(default)]
    extras: BTreeMap<String, Vec<String>>,
}

/// `[tool.poetry.group.<name>]`.
#[derive(Debug, Deserialize)]
struct RawPoetryGroup {
    #[serde(default)]
    dependencies: BTreeMap<String, PoetryDependency>,
}

/// A dependency declaration as written in the manifest.
///
/// Poetry accepts either a constraint string (`requests = "^2.31"`) or a
/// table (`moto = { version = "^5.0", extras = ["s3"] }`). Anything else
/// lands in [`PoetryDependency::Unsupported`] and fails validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PoetryDependency {
    /// Simple constraint string: `requests = "*"` or `requests = "^2.31"`.
    Simple(String),

    /// Table with extended fields. Keys other than `version` and `extras`
    /// (`optional`, `markers`, `git`, ...) are accepted and ignored.
    Detailed(PoetryDependencyDetail),

    /// Any other TOML value, e.g. a multiple-constraints array.
    Unsupported(toml::Value),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoetryDependencyDetail {
    pub version: Option<String>,

    #[serde(default)]
    pub extras: Vec<String>,
}

/// A validated dependency declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    /// The name exactly as written in the manifest.
    pub name: String,
    /// Requested extras as written, sorted.
    pub extras: Vec<String>,
    /// The declared constraint; `*` when the table omits one.
    pub version: String,
    canonical: CanonicalName,
}

impl DeclaredDependency {
    fn from_declaration(name: &str, dependency: &PoetryDependency) -> Result<Self, SchemaError> {
        let (mut extras, version) = match dependency {
            PoetryDependency::Simple(version) => (Vec::new(), version.clone()),
            PoetryDependency::Detailed(detail) => (
                detail.extras.clone(),
                detail.version.clone().unwrap_or_else(|| "*".to_owned()),
            ),
            PoetryDependency::Unsupported(value) => {
                return Err(SchemaError::UnsupportedDependency {
                    name: name.to_owned(),
                    value: value.to_string(),
                });
            }
        };
        extras.sort();

        let invalid = |err| SchemaError::InvalidName {
            name: name.to_owned(),
            err,
        };
        let package = PackageName::from_str(name).map_err(invalid)?;
        let canonical_extras = extras
            .iter()
            .map(|extra| ExtraName::from_str(extra))
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;

        Ok(Self {
            name: name.to_owned(),
            extras,
            version,
            canonical: CanonicalName::with_extras(package, canonical_extras),
        })
    }

    /// The key this dependency is looked up under in the resolved versions.
    pub fn canonical_name(&self) -> &CanonicalName {
        &self.canonical
    }

    /// The name as written, plus its extras qualifier if it has one.
    pub fn display_name(&self) -> String {
        if self.extras.is_empty() {
            self.name.clone()
        } else {
            format!("{}[{}]", self.name, join_sorted(&self.extras))
        }
    }

    /// Whether this is Poetry's interpreter constraint rather than a package.
    pub fn is_python(&self) -> bool {
        self.canonical.name().as_str() == PYTHON
    }
}

/// The validated dependency namespaces of `[tool.poetry]`.
#[derive(Debug, Clone, Default)]
pub struct PoetryConfig {
    dependencies: Vec<DeclaredDependency>,
    groups: BTreeMap<String, Vec<DeclaredDependency>>,
    extras: BTreeMap<String, Vec<PackageName>>,
}

impl FromStr for PoetryConfig {
    type Err = SchemaError;

    /// Parse and validate the Poetry sections of a `pyproject.toml`.
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let raw: RawPyProject = toml::from_str(content)?;
        let poetry = raw
            .tool
            .ok_or(SchemaError::MissingTable("tool"))?
            .poetry
            .ok_or(SchemaError::MissingTable("tool.poetry"))?;
        Self::validate(poetry)
    }
}

impl PoetryConfig {
    fn validate(raw: RawPoetryConfig) -> Result<Self, SchemaError> {
        let dependencies = declare_all(&raw.dependencies)?;

        let mut group_declarations: BTreeMap<String, BTreeMap<String, PoetryDependency>> =
            BTreeMap::new();
        if !raw.dev_dependencies.is_empty() {
            group_declarations.insert(LEGACY_DEV_GROUP.to_owned(), raw.dev_dependencies);
        }
        for (name, group) in raw.group {
            group_declarations
                .entry(name)
                .or_default()
                .extend(group.dependencies);
        }

        let groups = group_declarations
            .iter()
            .map(|(name, declarations)| Ok((name.clone(), declare_all(declarations)?)))
            .collect::<Result<_, SchemaError>>()?;

        let extras = raw
            .extras
            .into_iter()
            .map(|(extra, names)| {
                let names = names
                    .iter()
                    .map(|name| {
                        PackageName::from_str(name).map_err(|err| SchemaError::InvalidName {
                            name: name.clone(),
                            err,
                        })
                    })
                    .collect::<Result<_, _>>()?;
                Ok((extra, names))
            })
            .collect::<Result<_, SchemaError>>()?;

        Ok(Self {
            dependencies,
            groups,
            extras,
        })
    }

    /// `[tool.poetry.dependencies]`, sorted by declared name.
    pub fn main_dependencies(&self) -> &[DeclaredDependency] {
        &self.dependencies
    }

    /// Dependency groups by name, including legacy `dev-dependencies` as `dev`.
    pub fn groups(&self) -> &BTreeMap<String, Vec<DeclaredDependency>> {
        &self.groups
    }

    /// `[tool.poetry.extras]`: extra name to the dependency names it enables.
    pub fn extras(&self) -> &BTreeMap<String, Vec<PackageName>> {
        &self.extras
    }

    /// Find the main declaration with the given name, whatever its extras.
    pub fn find_main_dependency(&self, name: &PackageName) -> Option<&DeclaredDependency> {
        self.dependencies
            .iter()
            .find(|dependency| dependency.canonical.name() == name)
    }
}

fn declare_all(
    declarations: &BTreeMap<String, PoetryDependency>,
) -> Result<Vec<DeclaredDependency>, SchemaError> {
    declarations
        .iter()
        .map(|(name, dependency)| DeclaredDependency::from_declaration(name, dependency))
        .collect()
}
