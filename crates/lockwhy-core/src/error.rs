use std::path::PathBuf;
use thiserror::Error;

/// Error type for lockwhy operations.
///
/// Malformed package ids and unsatisfiable dependency ranges are not errors;
/// those records are skipped locally and never surface here.
#[derive(Error, Debug)]
pub enum WhyError {
    #[error("Failed to read lockfile at {path}: {source}")]
    LockfileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse lockfile at {path}: {source}")]
    LockfileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid package spec '{spec}': expected a package name, a lockfile location, or name@range")]
    InvalidSpec { spec: String },
}
