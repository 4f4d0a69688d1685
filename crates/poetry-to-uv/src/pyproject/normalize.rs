//! Canonical dependency names.
//!
//! Poetry, pip and uv all compare package names after PEP 503 normalization:
//! lowercase, with every run of `-`, `_` and `.` collapsed into a single `-`.
//! `poetry export` prints names in whatever case the lock file carries, so
//! every lookup between the manifest and the export goes through
//! [`CanonicalName`]. The normalization itself is uv's [`PackageName`] and
//! [`ExtraName`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use uv_normalize::{ExtraName, InvalidNameError, PackageName};

#[derive(Debug, Error)]
pub enum NameError {
    #[error(transparent)]
    Invalid(#[from] InvalidNameError),

    #[error("Missing closing `]` in `{0}`")]
    UnterminatedExtras(String),
}

/// A normalized package name plus its sorted extras (`moto[s3,sqs]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalName {
    name: PackageName,
    extras: Vec<ExtraName>,
}

impl CanonicalName {
    pub fn new(name: PackageName) -> Self {
        Self {
            name,
            extras: Vec::new(),
        }
    }

    /// Combine a name with its extras.
    ///
    /// Extras are sorted, so `moto` with `["sqs", "s3"]` and `moto` with
    /// `["s3", "sqs"]` are the same key.
    pub fn with_extras(name: PackageName, extras: impl IntoIterator<Item = ExtraName>) -> Self {
        let mut extras: Vec<ExtraName> = extras.into_iter().collect();
        extras.sort_unstable();
        extras.dedup();
        Self { name, extras }
    }

    pub fn name(&self) -> &PackageName {
        &self.name
    }

    pub fn extras(&self) -> &[ExtraName] {
        &self.extras
    }
}

impl FromStr for CanonicalName {
    type Err = NameError;

    /// Parse `name` or `name[extra,...]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((name, extras)) = s.split_once('[') else {
            return Ok(Self::new(PackageName::from_str(s)?));
        };
        let extras = extras
            .trim_end()
            .strip_suffix(']')
            .ok_or_else(|| NameError::UnterminatedExtras(s.to_owned()))?;
        let extras = extras
            .split(',')
            .map(str::trim)
            .filter(|extra| !extra.is_empty())
            .map(ExtraName::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_extras(PackageName::from_str(name.trim())?, extras))
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            let extras: Vec<&str> = self.extras.iter().map(ExtraName::as_str).collect();
            write!(f, "[{}]", extras.join(","))?;
        }
        Ok(())
    }
}

/// Sort extras and join them with commas, without normalizing them.
pub(crate) fn join_sorted<S: AsRef<str>>(extras: &[S]) -> String {
    let mut sorted: Vec<&str> = extras.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    sorted.join(",")
}
