//! Spec matching: turning a user query into lockfile locations.
//!
//! A query is tried in three forms, in order:
//! 1. a bare valid package name -> every location holding that package,
//!    at any depth, regardless of version
//! 2. an explicit lockfile location (backslashes and embedded
//!    `node_modules` segments normalized away) -> exactly that location
//! 3. `name@range` split at the last `@` past the first character ->
//!    every location whose package matches name and range
//!
//! A query that fits none of the forms is an invalid spec, and that is
//! fatal: a typo should be visible, not silently matched to nothing.

use crate::error::WhyError;
use crate::lockfile::Lockfile;
use crate::name::is_valid_package_name;
use crate::version::satisfies;

/// Match a single query string against the lockfile.
///
/// Returns matching locations in lockfile order. An empty result is not an
/// error; only a syntactically unrecognizable spec is.
pub fn match_spec(lockfile: &Lockfile, spec: &str) -> Result<Vec<String>, WhyError> {
    let spec = spec.trim();

    if is_valid_package_name(spec) {
        return Ok(match_by_name(lockfile, spec));
    }

    let normalized = normalize_location(spec);
    if lockfile.packages.contains_key(&normalized) {
        return Ok(vec![normalized]);
    }

    let Some((name, range)) = split_name_range(spec) else {
        return Err(WhyError::InvalidSpec {
            spec: spec.to_string(),
        });
    };
    Ok(match_by_range(lockfile, name, range))
}

/// All locations where the named package occurs: the top-level location
/// equal to the name itself, plus every location whose record id carries
/// that name.
fn match_by_name(lockfile: &Lockfile, name: &str) -> Vec<String> {
    let mut matches = Vec::new();

    if lockfile.packages.contains_key(name) {
        matches.push(name.to_string());
    }

    for (location, entry) in &lockfile.packages {
        if location == name {
            continue;
        }
        if entry.name_and_version().is_some_and(|(n, _)| n == name) {
            matches.push(location.clone());
        }
    }

    matches
}

/// All locations whose package matches `name` exactly and whose version
/// satisfies `range`. The `*` wildcard matches without a satisfaction
/// check, so it also reaches versions that are not parseable semver.
fn match_by_range(lockfile: &Lockfile, name: &str, range: &str) -> Vec<String> {
    lockfile
        .packages
        .iter()
        .filter(|(_, entry)| {
            entry
                .name_and_version()
                .is_some_and(|(n, v)| n == name && satisfies(v, range))
        })
        .map(|(location, _)| location.clone())
        .collect()
}

/// Normalize a user-supplied location: forward slashes only, and
/// `node_modules` path segments collapsed so a filesystem-style path maps
/// onto a lockfile key.
fn normalize_location(spec: &str) -> String {
    spec.replace('\\', "/")
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != "." && *seg != "node_modules")
        .collect::<Vec<_>>()
        .join("/")
}

/// Split `name@range` at the last `@` that is not the first character, so
/// scoped names keep their leading `@`. An empty range means any version.
fn split_name_range(spec: &str) -> Option<(&str, &str)> {
    let at = spec.get(1..)?.rfind('@')? + 1;
    let name = &spec[..at];
    let range = &spec[at + 1..];
    Some((name, if range.is_empty() { "*" } else { range }))
}
