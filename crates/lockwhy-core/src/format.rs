//! Text rendering of why trees.
//!
//! Output is a blank-line-separated block per top-level match with no
//! trailing newline. Each node prints an identity line, then its expanded
//! filesystem-style install path indented one level deeper, then its
//! dependents at the next depth:
//!
//! ```text
//! bar@1.2.0
//!   node_modules/foo/node_modules/bar
//!   foo@^1.0.0 from foo@1.0.0
//!     node_modules/foo
//! ```
//!
//! Path lines may be dimmed; whether the output stream supports that is the
//! caller's call, and plain text is the no-op default.

use crate::lockfile::Lockfile;
use crate::resolve::split_segments;
use crate::version::satisfies;
use crate::why::WhyNode;
use owo_colors::OwoColorize;

/// Directory marker prefixed to every path segment when expanding a
/// location for display.
pub const PACKAGES_DIR: &str = "node_modules";

/// Render why trees to text. Empty input renders as the empty string.
///
/// The lockfile is the same model the trees were built from; it supplies
/// the declared ranges shown on dependent lines.
#[must_use]
pub fn render(nodes: &[WhyNode], lockfile: &Lockfile, dim_paths: bool) -> String {
    let mut blocks = Vec::with_capacity(nodes.len());
    for node in nodes {
        let mut lines = Vec::new();
        render_node(node, None, 0, lockfile, dim_paths, &mut lines);
        blocks.push(lines.join("\n"));
    }
    blocks.join("\n\n")
}

fn render_node(
    node: &WhyNode,
    parent: Option<&WhyNode>,
    depth: usize,
    lockfile: &Lockfile,
    dim_paths: bool,
    lines: &mut Vec<String>,
) {
    let indent = "  ".repeat(depth);

    match parent {
        None => lines.push(format!("{}@{}", node.name, node.version)),
        Some(parent) => {
            let range = declared_range(lockfile, node, parent);
            lines.push(format!(
                "{indent}{}@{range} from {}@{}",
                node.name, node.name, node.version
            ));
        }
    }

    let path = format!("{indent}  {}", expand_location(&node.location));
    lines.push(if dim_paths {
        path.dimmed().to_string()
    } else {
        path
    });

    for dependent in &node.dependents {
        render_node(dependent, Some(node), depth + 1, lockfile, dim_paths, lines);
    }
}

/// The range `dependent` declared on its requirement that `parent`
/// satisfies: regular dependencies are searched first, then optional ones,
/// and the first range the parent's version satisfies is shown. Falls back
/// to `*`, which should not occur for an edge the index actually recorded.
fn declared_range(lockfile: &Lockfile, dependent: &WhyNode, parent: &WhyNode) -> String {
    let Some(entry) = lockfile.packages.get(&dependent.location) else {
        return "*".to_string();
    };

    entry
        .spec
        .iter()
        .find(|(name, range)| **name == parent.name && satisfies(&parent.version, range.as_str()))
        .map_or_else(|| "*".to_string(), |(_, range)| range.clone())
}

/// Expand a location into its on-disk form, one `node_modules` marker per
/// atomic segment: `foo/@s/b` becomes `node_modules/foo/node_modules/@s/b`.
fn expand_location(location: &str) -> String {
    let segments = split_segments(location);
    let mut path = String::new();
    for segment in &segments {
        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(PACKAGES_DIR);
        path.push('/');
        path.push_str(segment);
    }
    path
}
