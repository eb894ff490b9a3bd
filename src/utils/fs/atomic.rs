//! Atomic file writes using a stage-then-rename strategy.
//!
//! [`atomic_write_all`] writes several files so that a failure while producing
//! any of the new contents leaves every target untouched: all contents are
//! first written and synced to temporary files next to their targets, and only
//! then renamed over the targets in order.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Atomically replace several files, renaming them in slice order.
///
/// Staging (temp file creation, write, `fsync`) happens for every file before
/// any target is renamed. Existing permissions of a target are carried over
/// to its replacement.
///
/// # Errors
///
/// Fails if a temp file cannot be staged (no target has been modified yet) or
/// if a rename fails (targets earlier in the slice have already been replaced).
pub fn atomic_write_all(files: &[(&Path, &[u8])]) -> Result<()> {
    let mut staged = Vec::with_capacity(files.len());

    for (path, content) in files {
        let temp = stage(path, content)?;
        staged.push((temp, *path));
    }

    for (temp, path) in staged {
        temp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to move staged file into place: {}", path.display()))?;
        debug!("Wrote {}", path.display());
    }

    Ok(())
}

fn stage(path: &Path, content: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;

    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }

    temp.write_all(content)
        .with_context(|| format!("Failed to stage new content for {}", path.display()))?;
    temp.as_file().sync_all().context("Failed to sync staged file to disk")?;

    Ok(temp)
}
