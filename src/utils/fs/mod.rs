//! File system helpers used by the reconciler.

pub mod atomic;

pub use atomic::atomic_write_all;

use anyhow::{Context, Result};
use std::path::Path;

/// Read a project file as UTF-8 text.
pub fn read_text_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Display names of the paths in `paths` that do not exist, in input order.
#[must_use]
pub fn missing_files(paths: &[&Path]) -> Vec<String> {
    paths.iter().filter(|path| !path.exists()).map(|path| path.display().to_string()).collect()
}
