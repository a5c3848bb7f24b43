//! Reverse dependency index.
//!
//! Turns the lockfile's forward declarations (package -> its requirements)
//! into the mapping a "why" query needs: location -> locations that depend
//! on it. Built fresh per invocation, never persisted.

use crate::lockfile::Lockfile;
use crate::resolve::resolve_candidates;
use crate::version::satisfies;
use indexmap::IndexMap;
use tracing::debug;

/// Location -> ordered list of locations that require it.
///
/// Ordering follows lockfile traversal order, then declared dependency
/// order, so formatted output is deterministic.
pub type DependentIndex = IndexMap<String, Vec<String>>;

/// Build the reverse index for a lockfile.
///
/// For each declared dependency (regular first, then optional), candidate
/// locations are walked nearest-first; the first candidate present in the
/// lockfile whose version satisfies the declared range receives the edge,
/// and the walk stops. One declaration records at most one edge. A
/// declaration no candidate satisfies records nothing at all: that models
/// an optional or unresolved dependency, not an error.
#[must_use]
pub fn build_dependent_index(lockfile: &Lockfile) -> DependentIndex {
    let mut index = DependentIndex::new();

    for (location, entry) in &lockfile.packages {
        for (dep_name, range) in entry.spec.iter() {
            let mut resolved = false;
            for candidate in resolve_candidates(location, dep_name) {
                let Some(target) = lockfile.packages.get(&candidate) else {
                    continue;
                };
                let satisfied = target
                    .name_and_version()
                    .is_some_and(|(_, version)| satisfies(version, range));
                if satisfied {
                    index.entry(candidate).or_default().push(location.clone());
                    resolved = true;
                    break;
                }
            }
            if !resolved {
                debug!(%location, %dep_name, %range, "dependency resolved to no lockfile entry");
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lockfile::PackageEntry;

    fn dependents<'a>(index: &'a DependentIndex, location: &str) -> Vec<&'a str> {
        index
            .get(location)
            .map(|d| d.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_edge_from_top_level_dependency() {
        let mut lockfile = Lockfile::default();
        lockfile.insert("foo", PackageEntry::new("foo@1.0.0").with_dependency("bar", "^1.0.0"));
        lockfile.insert("bar", PackageEntry::new("bar@1.2.0"));

        let index = build_dependent_index(&lockfile);
        assert_eq!(dependents(&index, "bar"), ["foo"]);
    }

    #[test]
    fn test_nested_copy_wins_over_root() {
        // foo has a private copy of bar; the edge must go to it, not to the
        // hoisted root copy.
        let mut lockfile = Lockfile::default();
        lockfile.insert("foo", PackageEntry::new("foo@1.0.0").with_dependency("bar", "^1.0.0"));
        lockfile.insert("foo/bar", PackageEntry::new("bar@1.5.0"));
        lockfile.insert("bar", PackageEntry::new("bar@1.9.0"));

        let index = build_dependent_index(&lockfile);
        assert_eq!(dependents(&index, "foo/bar"), ["foo"]);
        assert!(dependents(&index, "bar").is_empty());
    }

    #[test]
    fn test_unsatisfying_near_copy_falls_through_to_root() {
        let mut lockfile = Lockfile::default();
        lockfile.insert("foo", PackageEntry::new("foo@1.0.0").with_dependency("bar", "^2.0.0"));
        lockfile.insert("foo/bar", PackageEntry::new("bar@1.5.0"));
        lockfile.insert("bar", PackageEntry::new("bar@2.1.0"));

        let index = build_dependent_index(&lockfile);
        assert!(dependents(&index, "foo/bar").is_empty());
        assert_eq!(dependents(&index, "bar"), ["foo"]);
    }

    #[test]
    fn test_unsatisfied_dependency_records_no_edge() {
        let mut lockfile = Lockfile::default();
        lockfile.insert("foo", PackageEntry::new("foo@1.0.0").with_dependency("gone", "^1.0.0"));
        lockfile.insert("bar", PackageEntry::new("bar@1.0.0"));

        let index = build_dependent_index(&lockfile);
        assert!(index.is_empty());
    }

    #[test]
    fn test_optional_dependencies_after_regular() {
        let mut lockfile = Lockfile::default();
        lockfile.insert(
            "app",
            PackageEntry::new("app@1.0.0")
                .with_optional_dependency("opt", "*")
                .with_dependency("dep", "*"),
        );
        lockfile.insert("dep", PackageEntry::new("dep@1.0.0"));
        lockfile.insert("opt", PackageEntry::new("opt@1.0.0"));
        lockfile.insert("late", PackageEntry::new("late@1.0.0").with_dependency("dep", "*"));

        let index = build_dependent_index(&lockfile);
        // app resolves dep before opt despite declaration file order of the
        // two maps, and late's edge lands after app's.
        assert_eq!(dependents(&index, "dep"), ["app", "late"]);
        assert_eq!(dependents(&index, "opt"), ["app"]);
        let keys: Vec<_> = index.keys().collect();
        assert_eq!(keys, ["dep", "opt"]);
    }

    #[test]
    fn test_malformed_target_id_gets_no_edge() {
        let mut lockfile = Lockfile::default();
        lockfile.insert("foo", PackageEntry::new("foo@1.0.0").with_dependency("bad", "*"));
        lockfile.insert("bad", PackageEntry::new("bad-id-without-version"));

        let index = build_dependent_index(&lockfile);
        assert!(dependents(&index, "bad").is_empty());
    }

    #[test]
    fn test_every_index_key_exists_in_lockfile() {
        let mut lockfile = Lockfile::default();
        lockfile.insert("a", PackageEntry::new("a@1.0.0").with_dependency("b", "*"));
        lockfile.insert("b", PackageEntry::new("b@1.0.0").with_dependency("c", "*"));
        lockfile.insert("b/c", PackageEntry::new("c@2.0.0"));

        let index = build_dependent_index(&lockfile);
        for location in index.keys() {
            assert!(lockfile.packages.contains_key(location));
        }
    }
}
