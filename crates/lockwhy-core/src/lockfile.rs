//! Lockfile model: a typed, read-only view over the parsed lockfile.
//!
//! The lockfile maps each *location* to a package record. A location is a
//! `/`-delimited path of package names mirroring the nested install tree
//! (`foo/bar` is the copy of `bar` installed privately under `foo`); a
//! scoped package occupies two path segments that are always treated as one
//! atomic unit. The record itself is a 3-or-4-element array:
//!
//! ```json
//! {
//!   "packages": {
//!     "foo":     ["foo@1.0.0", "", {"dependencies": {"bar": "^1.0.0"}}, "sha512-..."],
//!     "foo/bar": ["bar@1.2.0", "", {}]
//!   }
//! }
//! ```
//!
//! The registry marker and integrity string are carried but never
//! interpreted here.

use crate::error::WhyError;
use crate::jsonc;
use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Well-known lockfile filename.
pub const LOCKFILE_NAME: &str = "bun.lock";

/// Declared dependencies of a package record (name -> semver range).
///
/// Iteration order matters downstream: the reverse index records dependents
/// in declaration order, and the formatter searches `dependencies` before
/// `optional_dependencies` when recovering a displayed range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DependencySpec {
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    #[serde(default, rename = "optionalDependencies")]
    pub optional_dependencies: IndexMap<String, String>,
}

impl DependencySpec {
    /// Iterate declared dependencies, regular first, then optional.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.dependencies
            .iter()
            .chain(self.optional_dependencies.iter())
    }
}

/// One package record from the lockfile `packages` map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    /// `name@version` identifier. For scoped packages the name itself
    /// contains an `@`, so only the last `@` past index 0 separates the
    /// version.
    pub id: String,
    /// Registry or tarball marker; empty for the default registry.
    pub registry: Option<String>,
    /// Declared dependencies.
    pub spec: DependencySpec,
    /// Subresource integrity hash, when present.
    pub integrity: Option<String>,
}

impl PackageEntry {
    /// Create an entry with no dependencies (test and builder convenience).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            registry: None,
            spec: DependencySpec::default(),
            integrity: None,
        }
    }

    /// Add a regular dependency.
    #[must_use]
    pub fn with_dependency(mut self, name: impl Into<String>, range: impl Into<String>) -> Self {
        self.spec.dependencies.insert(name.into(), range.into());
        self
    }

    /// Add an optional dependency.
    #[must_use]
    pub fn with_optional_dependency(
        mut self,
        name: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        self.spec
            .optional_dependencies
            .insert(name.into(), range.into());
        self
    }

    /// Split the id into `(name, version)` at the last `@` found from
    /// index 1 onward, so a leading scope `@` never counts as a separator.
    ///
    /// Returns `None` for malformed ids (no separator, or an empty version).
    /// Callers skip such records rather than erroring.
    #[must_use]
    pub fn name_and_version(&self) -> Option<(&str, &str)> {
        let at = self.id.get(1..)?.rfind('@')? + 1;
        let name = &self.id[..at];
        let version = &self.id[at + 1..];
        if version.is_empty() {
            return None;
        }
        Some((name, version))
    }
}

// Records are positional arrays, not objects, and the integrity element is
// optional, so this cannot be a derived tuple struct.
impl<'de> Deserialize<'de> for PackageEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parts = Vec::<Value>::deserialize(deserializer)?;
        let mut parts = parts.into_iter();

        let id = match parts.next() {
            Some(Value::String(s)) => s,
            _ => return Err(de::Error::custom("package record must start with an id string")),
        };
        let registry = match parts.next() {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        let spec = match parts.next() {
            Some(meta @ Value::Object(_)) => {
                serde_json::from_value(meta).map_err(de::Error::custom)?
            }
            _ => DependencySpec::default(),
        };
        let integrity = match parts.next() {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };

        Ok(Self {
            id,
            registry,
            spec,
            integrity,
        })
    }
}

/// The portion of the lockfile this tool reads.
///
/// `IndexMap` preserves the file's own ordering; dependents-list ordering
/// and therefore output ordering derive from it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Lockfile {
    #[serde(default)]
    pub packages: IndexMap<String, PackageEntry>,
}

impl Lockfile {
    /// Read and parse the lockfile at `path`.
    ///
    /// Loaded exactly once per invocation; the same model feeds both the
    /// reverse-index builder and the formatter.
    pub fn load(path: &Path) -> Result<Self, WhyError> {
        let text = fs::read_to_string(path).map_err(|source| WhyError::LockfileRead {
            path: path.to_path_buf(),
            source,
        })?;
        jsonc::from_str(&text).map_err(|source| WhyError::LockfileParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Insert a record (test and builder convenience).
    pub fn insert(&mut self, location: impl Into<String>, entry: PackageEntry) {
        self.packages.insert(location.into(), entry);
    }
}
