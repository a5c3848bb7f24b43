//! Location resolution: which installed copy satisfies a dependency request.
//!
//! Mirrors nested-directory module lookup. A package at `a/b/c` asking for
//! `d` checks its own subtree first, then each enclosing level, then the
//! root: `a/b/c/d`, `a/b/d`, `a/d`, `d`. The nearest copy wins, which is
//! exactly the hoisting behavior a package manager's resolver implements on
//! disk.

/// Split a location into atomic segments.
///
/// A scoped package occupies two path components (`@scope` then `name`) that
/// form one atomic segment; they are never split or truncated separately.
#[must_use]
pub fn split_segments(location: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut parts = location.split('/').filter(|p| !p.is_empty());

    while let Some(part) = parts.next() {
        if part.starts_with('@') {
            match parts.next() {
                Some(name) => segments.push(format!("{part}/{name}")),
                None => segments.push(part.to_string()),
            }
        } else {
            segments.push(part.to_string());
        }
    }

    segments
}

/// Candidate locations for `dep_name` requested from `location`, ordered
/// nearest-ancestor-first and ending with the bare name.
///
/// The sequence is lazy and finite (path depth + 1 elements). The caller
/// stops at the first candidate that is present in the lockfile and whose
/// version satisfies the declared range.
pub fn resolve_candidates<'a>(
    location: &str,
    dep_name: &'a str,
) -> impl Iterator<Item = String> + 'a {
    let segments = split_segments(location);
    (0..=segments.len()).rev().map(move |depth| {
        if depth == 0 {
            dep_name.to_string()
        } else {
            format!("{}/{dep_name}", segments[..depth].join("/"))
        }
    })
}
