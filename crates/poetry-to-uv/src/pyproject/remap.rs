//! Remap declared dependencies onto resolved versions.
//!
//! Each of Poetry's three dependency namespaces is resolved independently:
//!
//! - `[tool.poetry.dependencies]` -> [`Remapped::main`], keyed by the name as
//!   written (plus extras)
//! - `[tool.poetry.group.*]` -> [`Remapped::groups`], keyed by canonical name
//! - `[tool.poetry.extras]` -> [`Remapped::extras`], keyed by canonical name
//!
//! A declaration missing from the resolver output is kept with an empty
//! version and reported through [`Remapped::unresolved`].

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::pyproject::export::ResolvedDependencies;
use crate::pyproject::model::PoetryConfig;
use crate::pyproject::normalize::CanonicalName;

/// Dependency names to their pinned versions, sorted by name.
///
/// `None` marks a dependency the resolver did not report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinnedDependencies(BTreeMap<String, Option<String>>);

impl PinnedDependencies {
    pub fn insert(&mut self, name: String, version: Option<String>) {
        self.0.insert(name, version);
    }

    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.0.get(name).map(Option::as_deref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0
            .iter()
            .map(|(name, version)| (name.as_str(), version.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// PEP 508 requirement strings (`name == version`), in name order.
    pub fn requirements(&self) -> impl Iterator<Item = String> {
        self.iter()
            .map(|(name, version)| format_requirement(name, version))
    }
}

/// Format a pinned requirement. An unresolved dependency stays unpinned.
pub fn format_requirement(name: &str, version: Option<&str>) -> String {
    match version {
        Some(version) => format!("{name} == {version}"),
        None => name.to_owned(),
    }
}

/// The namespace an unresolved dependency was declared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Main,
    Group(String),
    Extra(String),
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("dependencies"),
            Self::Group(name) => write!(f, "group `{name}`"),
            Self::Extra(name) => write!(f, "extra `{name}`"),
        }
    }
}

/// A declared dependency the resolver output had no version for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub name: String,
    pub section: Section,
}

/// The three resolved namespaces, ready to be written.
#[derive(Debug, Clone, Default)]
pub struct Remapped {
    pub main: PinnedDependencies,
    pub groups: BTreeMap<String, PinnedDependencies>,
    pub extras: BTreeMap<String, PinnedDependencies>,
    pub unresolved: Vec<Unresolved>,
}

impl Remapped {
    /// Resolve every namespace of `config` against `resolved`.
    pub fn new(config: &PoetryConfig, resolved: &ResolvedDependencies) -> Self {
        let mut remapper = Remapper {
            resolved,
            unresolved: Vec::new(),
        };
        let main = remapper.main(config);
        let groups = remapper.groups(config);
        let extras = remapper.extras(config);
        Self {
            main,
            groups,
            extras,
            unresolved: remapper.unresolved,
        }
    }
}

struct Remapper<'a> {
    resolved: &'a ResolvedDependencies,
    unresolved: Vec<Unresolved>,
}

impl Remapper<'_> {
    fn lookup(&mut self, key: &CanonicalName, name: &str, section: &Section) -> Option<String> {
        let version = self.resolved.get(key).map(str::to_owned);
        if version.is_none() {
            self.unresolved.push(Unresolved {
                name: name.to_owned(),
                section: section.clone(),
            });
        }
        version
    }

    fn main(&mut self, config: &PoetryConfig) -> PinnedDependencies {
        let mut pinned = PinnedDependencies::default();
        for dependency in config.main_dependencies() {
            if dependency.is_python() {
                debug!(
                    "Skipping interpreter constraint `{} = {}`",
                    dependency.name, dependency.version
                );
                continue;
            }
            let name = dependency.display_name();
            let version = self.lookup(dependency.canonical_name(), &name, &Section::Main);
            pinned.insert(name, version);
        }
        pinned
    }

    fn groups(&mut self, config: &PoetryConfig) -> BTreeMap<String, PinnedDependencies> {
        let mut groups = BTreeMap::new();
        for (group, dependencies) in config.groups() {
            let section = Section::Group(group.clone());
            let mut pinned = PinnedDependencies::default();
            for dependency in dependencies {
                let key = dependency.canonical_name();
                let version = self.lookup(key, &dependency.name, &section);
                pinned.insert(key.to_string(), version);
            }
            groups.insert(group.clone(), pinned);
        }
        groups
    }

    /// Extras only list names; the extras qualifiers of the matching main
    /// declaration decide which export line they correspond to.
    fn extras(&mut self, config: &PoetryConfig) -> BTreeMap<String, PinnedDependencies> {
        let mut extras = BTreeMap::new();
        for (extra, names) in config.extras() {
            let section = Section::Extra(extra.clone());
            let mut pinned = PinnedDependencies::default();
            for name in names {
                let key = config.find_main_dependency(name).map_or_else(
                    || CanonicalName::new(name.clone()),
                    |declared| declared.canonical_name().clone(),
                );
                let version = self.lookup(&key, name.as_str(), &section);
                pinned.insert(name.to_string(), version);
            }
            extras.insert(extra.clone(), pinned);
        }
        extras
    }
}
