//! Error types.
//!
//! [`Error`] covers everything that aborts a run before (or instead of)
//! processing items.  [`CopyError`] is the per-item failure produced by
//! [`crate::copy`]; the reconciler logs it and moves on.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Fatal startup errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("could not determine the home directory")]
    HomeDirUnresolved,

    #[error("error loading config file ({}): {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error parsing config file ({}): {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid dotfiles entry '{item}': {reason}")]
    InvalidItem { item: String, reason: &'static str },

    #[error(
        "dotfiles repository directory does not exist ({}). Run 'gotfiles init' first",
        .path.display()
    )]
    RepoMissing { path: PathBuf },

    #[error("could not create {}: {source}", .path.display())]
    RepoCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A failed filesystem operation inside [`crate::copy::copy_path`].
#[derive(Error, Debug)]
#[error("{op} {}: {source}", .path.display())]
pub struct CopyError {
    /// Short verb describing what was attempted, e.g. `"read"`.
    pub op: &'static str,
    /// The path the operation was applied to.
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl CopyError {
    pub fn new(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            op,
            path: path.into(),
            source,
        }
    }
}
