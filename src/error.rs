//! Error types for the menu stores and the release check.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing one of the shell's JSON/text files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize entries: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised by the release check.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("release feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("release feed returned an unreadable version '{0}'")]
    Version(String),
}
