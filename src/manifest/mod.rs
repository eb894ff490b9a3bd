//! Manifest (`conanfile.yml`) editing
//!
//! The manifest is a human-edited YAML file. It is never parsed into a document
//! tree: comments, ordering and formatting must survive an update unchanged, so
//! edits are applied to the raw text.
//!
//! A package is referenced by a list item line:
//!
//! ```yaml
//! requirements:
//!   - zlib/1.3.1
//!   - fmt/10.2.1@acme/stable  # pinned by platform team
//! ```
//!
//! Only lines of the shape `<indent>- <name>/<version>...` where `<name>` is
//! exactly the target package are touched. The version is replaced in place;
//! indentation, the list marker, any `@user/channel` or `#revision` suffix and
//! trailing comments are preserved.
//!
//! # Examples
//!
//! ```rust
//! use conan_sync::manifest::ManifestEditor;
//!
//! let text = "requirements:\n  - zlib/1.2.13\n  - zlibng/2.0.0\n";
//! assert_eq!(ManifestEditor::current_version(text, "zlib").as_deref(), Some("1.2.13"));
//!
//! let edit = ManifestEditor::update_version(text, "zlib", "1.3.1");
//! assert_eq!(edit.content, "requirements:\n  - zlib/1.3.1\n  - zlibng/2.0.0\n");
//! assert_eq!(edit.replacements, 1);
//! ```

use crate::core::EditResult;
use regex::{Captures, Regex};
use tracing::{debug, warn};

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "conanfile.yml";

/// Reads and patches package lines in manifest text.
pub struct ManifestEditor;

impl ManifestEditor {
    fn line_pattern(package: &str) -> Regex {
        let pattern =
            format!(r"(?m)^(?P<lead>[ \t]*-[ \t]+){}/(?P<version>[^\s@#]+)", regex::escape(package));
        Regex::new(&pattern).expect("escaped package name forms a valid pattern")
    }

    /// Version on the first line referencing `package`.
    #[must_use]
    pub fn current_version(text: &str, package: &str) -> Option<String> {
        Self::line_pattern(package)
            .captures(text)
            .map(|captures| captures["version"].to_string())
    }

    /// Replace the version on every line referencing `package`.
    ///
    /// Zero matches is not an error: the text is returned unchanged with
    /// `replacements == 0` and a warning is logged.
    #[must_use]
    pub fn update_version(text: &str, package: &str, version: &str) -> EditResult {
        let pattern = Self::line_pattern(package);
        let replacements = pattern.find_iter(text).count();

        if replacements == 0 {
            warn!("No manifest line references '{}'; manifest left unchanged", package);
            return EditResult {
                content: text.to_string(),
                replacements,
            };
        }

        let content = pattern
            .replace_all(text, |captures: &Captures<'_>| {
                format!("{}{}/{}", &captures["lead"], package, version)
            })
            .into_owned();
        debug!("Rewrote {} manifest line(s) for '{}' to {}", replacements, package, version);

        EditResult {
            content,
            replacements,
        }
    }
}
