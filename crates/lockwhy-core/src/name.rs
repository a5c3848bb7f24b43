//! Package name validity.
//!
//! Used by the spec matcher to decide whether a query string is a bare
//! package name before trying the location and name@range forms.

/// Maximum package name length, per registry rules.
const MAX_NAME_LEN: usize = 214;

/// Check whether `name` is a syntactically valid package name,
/// optionally scoped (`@scope/name`).
#[must_use]
pub fn is_valid_package_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return false;
    }

    match name.strip_prefix('@') {
        Some(rest) => match rest.split_once('/') {
            Some((scope, bare)) => is_valid_part(scope) && is_valid_part(bare),
            None => false,
        },
        None => is_valid_part(name),
    }
}

fn is_valid_part(part: &str) -> bool {
    if part.is_empty() || part.starts_with('.') || part.starts_with('_') {
        return false;
    }
    part.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.' | '~'))
}
