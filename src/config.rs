//! Configuration types and loading logic.
//!
//! `Config` is a direct 1-to-1 mapping of `config.json`.  Unlike most of the
//! tool's inputs the file is mandatory: without it there is nothing to track,
//! so a missing or malformed file aborts the run.
//!
//! # File format
//!
//! ```json
//! {
//!   "dotfiles": [
//!     ".vimrc",
//!     ".gitconfig",
//!     ".config/nvim"
//!   ]
//! }
//! ```
//!
//! Every entry is a path relative to the home directory.  It may name a file
//! or a directory; the same relative path is used inside `dotfiles/`.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ─── Top-level ────────────────────────────────────────────────────────────────

/// Root configuration object, deserialised from `config.json`.
#[derive(Debug, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Tracked items, processed in list order.  Duplicates are processed
    /// twice; the second pass finds a symlink and skips it.
    #[serde(default)]
    pub dotfiles: Vec<String>,
}

impl Config {
    /// Check every entry, returning the first one that cannot be tracked.
    pub fn validate(&self) -> Result<(), Error> {
        self.dotfiles.iter().try_for_each(|item| validate_item(item))
    }
}

fn validate_item(item: &str) -> Result<(), Error> {
    let invalid = |reason| Error::InvalidItem {
        item: item.to_string(),
        reason,
    };

    if item.trim().is_empty() {
        return Err(invalid("entry is empty"));
    }
    if Path::new(item)
        .components()
        .any(|c| c == Component::ParentDir)
    {
        return Err(invalid("entries may not contain '..'"));
    }
    if relative_path(item).as_os_str().is_empty() {
        return Err(invalid("entry does not name anything below the home directory"));
    }
    Ok(())
}

/// The item as a path relative to both the home directory and `dotfiles/`.
///
/// A leading `/` is dropped, so `"/.vimrc"` and `".vimrc"` name the same
/// item.  `.` components are dropped as well.
pub fn relative_path(item: &str) -> PathBuf {
    Path::new(item)
        .components()
        .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
        .collect()
}

// ─── Loader ───────────────────────────────────────────────────────────────────

/// Read, parse and validate a `Config` from `path`.
///
/// Returns an error if the file is missing, cannot be read, is not valid
/// JSON, or contains an entry that cannot be tracked.
pub fn load_config(path: &Path) -> Result<Config, Error> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let cfg: Config = serde_json::from_str(&text).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    cfg.validate()?;
    tracing::debug!(path = %path.display(), items = cfg.dotfiles.len(), "loaded config");
    Ok(cfg)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
