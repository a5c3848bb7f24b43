//! Why-tree construction: who pulls a package in, transitively.

use crate::error::WhyError;
use crate::index::{build_dependent_index, DependentIndex};
use crate::lockfile::Lockfile;
use crate::query::match_spec;
use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

/// One node of a why tree: a package, and the packages that require it.
///
/// Dependents are computed per traversal rather than cached; the same
/// location can appear at several tree positions with different local
/// context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhyNode {
    pub name: String,
    pub version: String,
    pub location: String,
    pub dependents: Vec<WhyNode>,
}

/// Explain a set of user specs against a loaded lockfile.
///
/// Matches each spec, unions the resulting locations (first-seen order,
/// duplicates collapse), and builds one why tree per location. An empty
/// spec list yields an empty result. An invalid spec fails the whole call.
pub fn explain(lockfile: &Lockfile, specs: &[String]) -> Result<Vec<WhyNode>, WhyError> {
    let index = build_dependent_index(lockfile);

    let mut locations = IndexSet::new();
    for spec in specs {
        locations.extend(match_spec(lockfile, spec)?);
    }

    Ok(locations
        .iter()
        .filter_map(|location| build_why(location, lockfile, &index, &mut Vec::new()))
        .collect())
}

/// Build the why tree rooted at `location`.
///
/// Returns `None` only when the record's id fails to decompose into name
/// and version; that record is skipped, not an error. `active` holds the
/// locations on the current recursion path: dependency cycles are legal in
/// real lockfiles (optional and peer dependencies), so a location already
/// on the path is emitted once more without its dependents instead of
/// recursing forever.
pub fn build_why(
    location: &str,
    lockfile: &Lockfile,
    index: &DependentIndex,
    active: &mut Vec<String>,
) -> Option<WhyNode> {
    let entry = lockfile.packages.get(location)?;
    let Some((name, version)) = entry.name_and_version() else {
        debug!(%location, id = %entry.id, "skipping record with malformed id");
        return None;
    };

    let mut node = WhyNode {
        name: name.to_string(),
        version: version.to_string(),
        location: location.to_string(),
        dependents: Vec::new(),
    };

    if active.iter().any(|l| l == location) {
        // Cycle: truncate here.
        return Some(node);
    }

    if let Some(dependents) = index.get(location) {
        active.push(location.to_string());
        node.dependents = dependents
            .iter()
            .filter_map(|dependent| build_why(dependent, lockfile, index, active))
            .collect();
        active.pop();
    }

    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lockfile::PackageEntry;

    fn fixture() -> Lockfile {
        let mut lockfile = Lockfile::default();
        lockfile.insert("foo", PackageEntry::new("foo@1.0.0").with_dependency("bar", "^1.0.0"));
        lockfile.insert("foo/bar", PackageEntry::new("bar@1.2.0"));
        lockfile
    }

    #[test]
    fn test_explain_builds_dependent_chain() {
        let lockfile = fixture();
        let nodes = explain(&lockfile, &["bar".to_string()]).unwrap();

        assert_eq!(nodes.len(), 1);
        let bar = &nodes[0];
        assert_eq!(bar.name, "bar");
        assert_eq!(bar.version, "1.2.0");
        assert_eq!(bar.location, "foo/bar");

        assert_eq!(bar.dependents.len(), 1);
        let foo = &bar.dependents[0];
        assert_eq!(foo.name, "foo");
        assert_eq!(foo.version, "1.0.0");
        assert!(foo.dependents.is_empty());
    }

    #[test]
    fn test_explain_empty_specs() {
        let lockfile = fixture();
        assert!(explain(&lockfile, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_explain_is_idempotent() {
        let lockfile = fixture();
        let specs = vec!["bar".to_string(), "foo".to_string()];
        assert_eq!(
            explain(&lockfile, &specs).unwrap(),
            explain(&lockfile, &specs).unwrap()
        );
    }

    #[test]
    fn test_duplicate_matches_collapse() {
        let lockfile = fixture();
        let specs = vec!["bar".to_string(), "bar@^1.0.0".to_string()];
        let nodes = explain(&lockfile, &specs).unwrap();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_invalid_spec_fails_whole_call() {
        let lockfile = fixture();
        let specs = vec!["bar".to_string(), "Not A Spec".to_string()];
        assert!(explain(&lockfile, &specs).is_err());
    }

    #[test]
    fn test_malformed_id_is_skipped_not_fatal() {
        let mut lockfile = fixture();
        lockfile.insert("broken", PackageEntry::new("no-version-here"));

        // The malformed record never becomes a node, and the rest of the
        // graph is unaffected.
        let nodes = explain(&lockfile, &["bar".to_string()]).unwrap();
        assert_eq!(nodes.len(), 1);
        let by_name = explain(&lockfile, &["no-version-here".to_string()]).unwrap();
        assert!(by_name.is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        // a and b require each other (legal via optional deps).
        let mut lockfile = Lockfile::default();
        lockfile.insert("a", PackageEntry::new("a@1.0.0").with_dependency("b", "*"));
        lockfile.insert("b", PackageEntry::new("b@1.0.0").with_dependency("a", "*"));

        let nodes = explain(&lockfile, &["a".to_string()]).unwrap();
        assert_eq!(nodes.len(), 1);

        let a = &nodes[0];
        let b = &a.dependents[0];
        assert_eq!(b.name, "b");
        // The repeated occurrence of `a` is emitted once, truncated.
        let a_again = &b.dependents[0];
        assert_eq!(a_again.name, "a");
        assert!(a_again.dependents.is_empty());
    }

    #[test]
    fn test_self_dependency_terminates() {
        let mut lockfile = Lockfile::default();
        lockfile.insert("loop", PackageEntry::new("loop@1.0.0").with_dependency("loop", "*"));

        let nodes = explain(&lockfile, &["loop".to_string()]).unwrap();
        let node = &nodes[0];
        assert_eq!(node.dependents.len(), 1);
        assert!(node.dependents[0].dependents.is_empty());
    }
}
