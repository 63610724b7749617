use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ManifestError>;

/// Conditions that stop a manifest build.
///
/// Everything about dates (missing tables, unparseable rows, unmatched
/// tournaments) is recoverable and never surfaces here.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("results root {0} is not a directory")]
    RootNotFound(PathBuf),

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid season {0:?}, expected e.g. 2025-2026")]
    InvalidSeason(String),
}
