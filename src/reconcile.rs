//! Per-item reconciliation between the home directory and `dotfiles/`.
//!
//! Every tracked item goes through the same two steps on every run:
//!
//! | Source in home      | Backup step                                 |
//! |---------------------|---------------------------------------------|
//! | symlink             | skipped, assumed to be migrated already     |
//! | under a linked dir  | skipped, already inside `dotfiles/`         |
//! | directory           | copied into `dotfiles/`, original removed   |
//! | regular file        | copied into `dotfiles/`, original removed   |
//! | missing             | nothing                                     |
//! | inaccessible        | error logged                                |
//!
//! Then the link step: if the source is now absent and `dotfiles/` holds a
//! copy, the source becomes a symlink to that copy.  If there is no copy the
//! item is left alone.
//!
//! Failures are logged and recorded on the item's [`ItemOutcome`]; they never
//! stop the next item from being processed and nothing is rolled back.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    config::relative_path,
    copy::{DEFAULT_DIR_MODE, copy_path, create_dirs},
};

// ─── Run mode ─────────────────────────────────────────────────────────────────

/// Which command is reconciling.  Only wording differs between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Init,
    Sync,
}

impl RunMode {
    /// Message used for the `git commit` that follows reconciliation.
    pub const fn commit_message(self) -> &'static str {
        match self {
            Self::Init => "Update dotfiles backup",
            Self::Sync => "Sync dotfiles changes",
        }
    }

    const fn backup_verb(self) -> &'static str {
        match self {
            Self::Init => "copied",
            Self::Sync => "updated",
        }
    }
}

// ─── Outcome ──────────────────────────────────────────────────────────────────

/// What was found at the source path before anything was changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    Symlink,
    /// Reached through a symlinked parent that points into the repository,
    /// e.g. `.config/nvim` once `.config` itself is tracked.
    InRepository,
    Directory,
    File,
    Missing,
    Inaccessible,
}

/// Result of the link step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// A symlink from the source to the repository copy was created.
    Created,
    /// The source still exists (symlink, failed copy, failed removal, or
    /// inaccessible), so no link was attempted.
    NotNeeded,
    /// The source is absent and the repository holds no copy.
    NoBackup,
    /// Creating the symlink failed.
    Failed,
}

/// Everything that happened to one tracked item.
#[derive(Debug)]
pub struct ItemOutcome {
    pub item: String,
    pub mode: RunMode,
    pub source: SourceState,
    /// The source was copied into the repository.
    pub backed_up: bool,
    /// The original was removed from home after the copy.
    pub removed: bool,
    pub link: LinkState,
    /// Per-item errors, in the order they occurred.
    pub errors: Vec<String>,
}

impl ItemOutcome {
    fn new(item: &str, mode: RunMode) -> Self {
        Self {
            item: item.to_string(),
            mode,
            source: SourceState::Missing,
            backed_up: false,
            removed: false,
            link: LinkState::NotNeeded,
            errors: Vec::new(),
        }
    }

    fn error(&mut self, msg: String) {
        tracing::error!("{msg}");
        self.errors.push(msg);
    }

    /// Returns `true` if any step for this item failed.
    pub fn failed(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Short human-readable description, e.g. `"copied file, linked"`.
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        let kind = match self.source {
            SourceState::Directory => "directory",
            _ => "file",
        };

        match self.source {
            SourceState::Symlink => parts.push("already a symlink".into()),
            SourceState::InRepository => parts.push("already in repository".into()),
            SourceState::Missing => parts.push("not in home".into()),
            SourceState::Inaccessible => parts.push("inaccessible".into()),
            SourceState::Directory | SourceState::File if self.backed_up => {
                parts.push(format!("{} {kind}", self.mode.backup_verb()));
            },
            SourceState::Directory | SourceState::File => parts.push(format!("{kind} not copied")),
        }
        if self.backed_up && !self.removed {
            parts.push("original kept".into());
        }
        match self.link {
            LinkState::Created => parts.push("linked".into()),
            LinkState::NoBackup => parts.push("no backup in repository".into()),
            LinkState::Failed => parts.push("link failed".into()),
            LinkState::NotNeeded => {},
        }
        parts.join(", ")
    }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

/// Back up `item` from `home` into `dotfiles_dir` and link it back.
///
/// `item` is relative to both directories.  Never fails: every error is
/// logged and recorded on the returned outcome.
pub fn process_path(item: &str, home: &Path, dotfiles_dir: &Path, mode: RunMode) -> ItemOutcome {
    let (source, dest) = item_paths(item, home, dotfiles_dir);
    let mut out = ItemOutcome::new(item, mode);

    let _span = tracing::debug_span!("item", item).entered();
    tracing::debug!(source = %source.display(), dest = %dest.display(), "reconciling");

    match fs::symlink_metadata(&source) {
        Ok(meta) if meta.file_type().is_symlink() => {
            out.source = SourceState::Symlink;
            tracing::info!("skipping backup for {item} as it is already a symlink");
        },
        Ok(meta) => match resolves_into(&source, dotfiles_dir) {
            Ok(true) => {
                out.source = SourceState::InRepository;
                tracing::info!("skipping backup for {item} as it is already in the repository");
            },
            Ok(false) => back_up(&mut out, &source, &dest, meta.is_dir()),
            Err(e) => {
                out.source = SourceState::Inaccessible;
                out.error(format!("error resolving {item}: {e}"));
            },
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            out.source = SourceState::Missing;
            tracing::warn!("{item} does not exist in home");
        },
        Err(e) => {
            out.source = SourceState::Inaccessible;
            out.error(format!("error accessing {item}: {e}"));
        },
    }

    let link = link_if_absent(&mut out, &source, &dest);
    out.link = link;
    out
}

/// Copy the source into the repository, then remove the original.  The
/// original is only removed once the copy has fully succeeded.
fn back_up(out: &mut ItemOutcome, source: &Path, dest: &Path, is_dir: bool) {
    let kind = if is_dir { "directory" } else { "file" };
    out.source = if is_dir {
        SourceState::Directory
    } else {
        SourceState::File
    };

    if let Err(e) = copy_path(source, dest) {
        out.error(format!("error copying {kind} {}: {e}", out.item));
        return;
    }
    out.backed_up = true;
    match out.mode {
        RunMode::Init => tracing::info!("copied {kind} {} to repository", out.item),
        RunMode::Sync => tracing::info!("updated {kind} {} in repository", out.item),
    }

    let removed = if is_dir {
        fs::remove_dir_all(source)
    } else {
        fs::remove_file(source)
    };
    match removed {
        Ok(()) => out.removed = true,
        Err(e) => out.error(format!("error removing original {kind} {}: {e}", out.item)),
    }
}

/// Whether `source`, with its parents' symlinks resolved, lies inside
/// `dotfiles_dir`.  Copying such a source would copy the backup onto itself
/// and then delete it.
fn resolves_into(source: &Path, dotfiles_dir: &Path) -> io::Result<bool> {
    let (Some(parent), Some(name)) = (source.parent(), source.file_name()) else {
        return Ok(false);
    };
    let real = fs::canonicalize(parent)?.join(name);
    let repo = fs::canonicalize(dotfiles_dir)?;
    Ok(real.starts_with(repo))
}

fn link_if_absent(out: &mut ItemOutcome, source: &Path, dest: &Path) -> LinkState {
    match fs::symlink_metadata(source) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {},
        _ => return LinkState::NotNeeded,
    }

    if fs::metadata(dest).is_err() {
        tracing::warn!("no backup for {} found in repository", out.item);
        return LinkState::NoBackup;
    }

    if let Some(parent) = source.parent() {
        if let Err(e) = create_dirs(parent, DEFAULT_DIR_MODE) {
            out.error(format!(
                "error creating {} for {}: {e}",
                parent.display(),
                out.item
            ));
            return LinkState::Failed;
        }
    }

    match symlink(dest, source) {
        Ok(()) => {
            tracing::info!("created symlink for {}", out.item);
            LinkState::Created
        },
        Err(e) => {
            out.error(format!("error creating symlink for {}: {e}", out.item));
            LinkState::Failed
        },
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are only supported on unix",
    ))
}

/// Source and repository paths for `item`, as used by [`process_path`].
pub fn item_paths(item: &str, home: &Path, dotfiles_dir: &Path) -> (PathBuf, PathBuf) {
    let rel = relative_path(item);
    (home.join(&rel), dotfiles_dir.join(rel))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
