//! Recursive copy into the repository.
//!
//! Directories are recreated with the permission bits of their source
//! directory.  Files are recreated with the process defaults: only their
//! bytes are copied, never their mode.  Anything that is not a directory is
//! read through, so a symlink inside a tracked tree becomes a regular file in
//! the repository.

use std::{
    fs::{self, File, Metadata},
    io,
    path::Path,
};

use walkdir::WalkDir;

use crate::error::CopyError;

/// Mode used for directories that have no source directory to copy bits from
/// (parents of a copied file, parents of a new symlink).
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Copy `src` to `dst`, recursing when `src` is a directory.
///
/// Existing destination files are overwritten and existing destination
/// directories are reused.  Nothing is ever removed from `dst`.
pub fn copy_path(src: &Path, dst: &Path) -> Result<(), CopyError> {
    let meta = fs::metadata(src).map_err(|e| CopyError::new("stat", src, e))?;
    if meta.is_dir() {
        copy_dir(src, dst)
    } else {
        copy_file(src, dst)
    }
}

/// Copy one file's bytes, creating missing parent directories of `dst`.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), CopyError> {
    let mut input = File::open(src).map_err(|e| CopyError::new("open", src, e))?;

    if let Some(parent) = dst.parent() {
        create_dirs(parent, DEFAULT_DIR_MODE)
            .map_err(|e| CopyError::new("create directory", parent, e))?;
    }

    let mut output = File::create(dst).map_err(|e| CopyError::new("create", dst, e))?;
    io::copy(&mut input, &mut output).map_err(|e| CopyError::new("copy", src, e))?;

    tracing::trace!(src = %src.display(), dst = %dst.display(), "copied file");
    Ok(())
}

/// Copy a directory tree.  The first failing entry aborts the copy; whatever
/// was already written stays in place.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<(), CopyError> {
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            CopyError::new("read", path, e.into())
        })?;

        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = if rel.as_os_str().is_empty() {
            dst.to_path_buf()
        } else {
            dst.join(rel)
        };

        if entry.file_type().is_dir() {
            let meta = entry
                .metadata()
                .map_err(|e| CopyError::new("stat", entry.path(), e.into()))?;
            create_dirs(&target, dir_mode(&meta))
                .map_err(|e| CopyError::new("create directory", &target, e))?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }
    Ok(())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// `mkdir -p` with an explicit mode for every directory it creates.
/// Directories that already exist keep their mode.
pub fn create_dirs(path: &Path, mode: u32) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(path)
}

#[cfg(unix)]
fn dir_mode(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn dir_mode(_meta: &Metadata) -> u32 {
    DEFAULT_DIR_MODE
}

// ─── Tests ────────────────────────────────────────────────────────────────────
