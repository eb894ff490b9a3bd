//! Test fixtures for project files
//!
//! Builders for `conanfile.yml` / `conan.lock` text and a temp project
//! directory holding both.

use crate::lockfile::LOCK_FILE;
use crate::manifest::MANIFEST_FILE;
use crate::reconciler::ProjectFiles;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Manifest listing `requires` (each `name/version...`) under `requirements:`.
#[must_use]
pub fn manifest_text(requires: &[&str]) -> String {
    let mut text = String::from("# conan-sync test project\nrequirements:\n");
    for require in requires {
        text.push_str("  - ");
        text.push_str(require);
        text.push('\n');
    }
    text
}

/// Lock file with `entries` (each `name/version#rev%ts`) under `requires`.
#[must_use]
pub fn lock_text(entries: &[&str]) -> String {
    let requires = entries
        .iter()
        .map(|entry| format!("        \"{entry}\""))
        .collect::<Vec<_>>()
        .join(",\n");
    format!(
        "{{\n    \"version\": \"0.5\",\n    \"requires\": [\n{requires}\n    ],\n    \"build_requires\": [],\n    \"python_requires\": []\n}}\n"
    )
}

/// A temp directory with a manifest and lock file.
pub struct ProjectFixture {
    /// Owns the directory; dropped with the fixture
    pub temp: TempDir,
}

impl ProjectFixture {
    /// Empty project directory.
    pub fn empty() -> Result<Self> {
        Ok(Self {
            temp: TempDir::new().context("Failed to create temp project dir")?,
        })
    }

    /// Project whose manifest lists `requires` and lock file holds `entries`.
    pub fn new(requires: &[&str], entries: &[&str]) -> Result<Self> {
        let fixture = Self::empty()?;
        fixture.write(MANIFEST_FILE, &manifest_text(requires))?;
        fixture.write(LOCK_FILE, &lock_text(entries))?;
        Ok(fixture)
    }

    /// Project directory.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Manifest path.
    pub fn manifest_path(&self) -> PathBuf {
        self.path().join(MANIFEST_FILE)
    }

    /// Lock file path.
    pub fn lock_path(&self) -> PathBuf {
        self.path().join(LOCK_FILE)
    }

    /// Both files with their default names.
    pub fn files(&self) -> ProjectFiles {
        ProjectFiles::in_dir(self.path(), MANIFEST_FILE, LOCK_FILE)
    }

    /// Write `content` to `name` inside the project.
    pub fn write(&self, name: &str, content: &str) -> Result<()> {
        let path = self.path().join(name);
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Current manifest text.
    pub fn manifest(&self) -> Result<String> {
        fs::read_to_string(self.manifest_path()).context("Failed to read manifest")
    }

    /// Current lock file text.
    pub fn lock(&self) -> Result<String> {
        fs::read_to_string(self.lock_path()).context("Failed to read lock file")
    }
}
