#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod format;
pub mod index;
pub mod jsonc;
pub mod lockfile;
pub mod name;
pub mod query;
pub mod resolve;
pub mod version;
pub mod why;

pub use error::WhyError;
pub use format::{render, PACKAGES_DIR};
pub use index::{build_dependent_index, DependentIndex};
pub use lockfile::{DependencySpec, Lockfile, PackageEntry, LOCKFILE_NAME};
pub use name::is_valid_package_name;
pub use query::match_spec;
pub use resolve::{resolve_candidates, split_segments};
pub use version::satisfies;
pub use why::{explain, WhyNode};
