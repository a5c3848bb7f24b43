//! Range satisfaction over semver.
//!
//! The engine only ever asks one question: does this concrete version
//! satisfy this declared range? `satisfies` is a pure predicate; ranges the
//! `semver` crate cannot represent after npm-syntax normalization satisfy
//! nothing rather than erroring, since an unsatisfied range simply produces
//! no reverse edge.

use semver::{Version, VersionReq};

/// Check whether `version` satisfies `range`.
///
/// npm range syntax beyond what `semver` parses natively is normalized
/// first:
/// - `*`, `x`, `X`, an empty range, and `latest` match any version
/// - x-ranges: `1.x`, `1.2.x`
/// - hyphen ranges: `1.0.0 - 2.0.0`
/// - space-separated AND comparators: `>= 2.1.2 < 3.0.0`
/// - OR alternatives: `^1.0.0 || ^2.0.0`
/// - a bare version is an exact match, not a caret range
#[must_use]
pub fn satisfies(version: &str, range: &str) -> bool {
    let range = range.trim();
    if is_wildcard(range) {
        return true;
    }

    let Ok(version) = Version::parse(version.trim()) else {
        return false;
    };

    if range.contains("||") {
        return range
            .split("||")
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .any(|alt| alternative_matches(alt, &version));
    }

    alternative_matches(range, &version)
}

fn is_wildcard(range: &str) -> bool {
    matches!(range, "" | "*" | "x" | "X" | "latest")
}

fn alternative_matches(range: &str, version: &Version) -> bool {
    if is_wildcard(range) {
        return true;
    }

    // npm treats a bare version as exact; `VersionReq` would read it as a
    // caret range.
    if let Ok(exact) = Version::parse(range) {
        return exact == *version;
    }

    parse_range(range).is_some_and(|req| req.matches(version))
}

/// Parse a single (non-OR) range, handling npm-specific syntax.
fn parse_range(range: &str) -> Option<VersionReq> {
    let range = range.trim();

    // Hyphen ranges: "1.0.0 - 2.0.0" -> ">=1.0.0, <=2.0.0"
    if let Some((start, end)) = parse_hyphen_range(range) {
        return VersionReq::parse(&format!(">={start}, <={end}")).ok();
    }

    // X-ranges: "1.x" -> ">=1.0.0, <2.0.0"
    if range.contains(['x', 'X']) {
        return VersionReq::parse(&convert_x_range(range)).ok();
    }

    // npm allows spaces between comparators to mean AND; Rust semver wants
    // commas.
    VersionReq::parse(&join_comparators(range)).ok()
}

/// Parse a hyphen range like "1.0.0 - 2.0.0".
fn parse_hyphen_range(range: &str) -> Option<(&str, &str)> {
    let (start, end) = range.split_once(" - ")?;
    let (start, end) = (start.trim(), end.trim());
    if start.is_empty() || end.is_empty() {
        return None;
    }
    Some((start, end))
}

/// Convert an x-range to a comparator pair the `semver` crate accepts.
fn convert_x_range(range: &str) -> String {
    let parts: Vec<&str> = range.split('.').collect();

    match parts.as_slice() {
        [major, "x" | "X" | "*"] => {
            if let Ok(m) = major.parse::<u64>() {
                return format!(">={m}.0.0, <{}.0.0", m + 1);
            }
        }
        [major, minor, "x" | "X" | "*"] => {
            if let (Ok(m), Ok(n)) = (major.parse::<u64>(), minor.parse::<u64>()) {
                return format!(">={m}.{n}.0, <{m}.{}.0", n + 1);
            }
        }
        _ => {}
    }

    range.replace(['x', 'X'], "0")
}

/// Join space-separated comparators with commas: ">= 2.1.2 < 3.0.0" becomes
/// ">=2.1.2, <3.0.0". An operator token with no digits attaches to the next
/// token rather than starting a new comparator.
fn join_comparators(range: &str) -> String {
    let mut comparators: Vec<String> = Vec::new();
    let mut pending_op = String::new();

    for token in range.split_whitespace() {
        if token.chars().any(|c| c.is_ascii_digit()) {
            comparators.push(format!("{pending_op}{token}"));
            pending_op.clear();
        } else {
            pending_op.push_str(token);
        }
    }
    if !pending_op.is_empty() {
        comparators.push(pending_op);
    }

    if comparators.is_empty() {
        range.to_string()
    } else {
        comparators.join(", ")
    }
}
