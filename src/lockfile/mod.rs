//! Lock file (`conan.lock`) editing
//!
//! The lock file is JSON whose interesting values are quoted lock entries:
//!
//! ```json
//! {
//!     "version": "0.5",
//!     "requires": [
//!         "zlib/1.3.1#b8bc2603263cf7eccbd6e17e66b0ed76%1733936244.862",
//!         "fmt/10.2.1#0123456789abcdef%1710000000.000"
//!     ]
//! }
//! ```
//!
//! Like the manifest it is patched as text so key order, indentation and
//! unrelated entries are untouched. A matching entry is replaced as a whole by
//! a freshly built one; nothing from the old entry is carried over.
//!
//! # Examples
//!
//! ```rust
//! use conan_sync::lockfile::LockEditor;
//!
//! let text = r#"{"requires": ["zlib/1.2.13#old%1.000"]}"#;
//! let edit = LockEditor::update_entry(text, "zlib", "1.3.1", "new", "2.000");
//! assert_eq!(edit.content, r#"{"requires": ["zlib/1.3.1#new%2.000"]}"#);
//! ```

use crate::core::EditResult;
use crate::reference::{LockEntry, build_lock_entry};
use regex::{Captures, Regex};
use tracing::{debug, warn};

/// Default lock file name.
pub const LOCK_FILE: &str = "conan.lock";

/// Reads and patches quoted lock entries in lock file text.
pub struct LockEditor;

impl LockEditor {
    fn entry_pattern(package: &str) -> Regex {
        let pattern =
            format!(r##""(?P<entry>{}/[^"#]+#[^"%]+%[^"]+)""##, regex::escape(package));
        Regex::new(&pattern).expect("escaped package name forms a valid pattern")
    }

    /// Every parsable lock entry for `package`, in file order.
    #[must_use]
    pub fn entries(text: &str, package: &str) -> Vec<LockEntry> {
        Self::entry_pattern(package)
            .captures_iter(text)
            .filter_map(|captures| LockEntry::parse(&captures["entry"]).ok())
            .collect()
    }

    /// First lock entry for `package`.
    #[must_use]
    pub fn current_entry(text: &str, package: &str) -> Option<LockEntry> {
        Self::entries(text, package).into_iter().next()
    }

    /// Replace every lock entry for `package` with
    /// `"{package}/{version}#{revision}%{timestamp}"`.
    ///
    /// Zero matches is not an error: the text is returned unchanged with
    /// `replacements == 0` and a warning is logged.
    #[must_use]
    pub fn update_entry(
        text: &str,
        package: &str,
        version: &str,
        revision: &str,
        timestamp: &str,
    ) -> EditResult {
        let replacement = build_lock_entry(&format!("{package}/{version}"), revision, timestamp);
        let mut replacements = 0usize;

        let content = Self::entry_pattern(package)
            .replace_all(text, |captures: &Captures<'_>| match LockEntry::parse(&captures["entry"]) {
                Ok(_) => {
                    replacements += 1;
                    format!("\"{replacement}\"")
                }
                Err(_) => captures[0].to_string(),
            })
            .into_owned();

        if replacements == 0 {
            warn!("No lock entry references '{}'; lock file left unchanged", package);
        } else {
            debug!("Rewrote {} lock entr(ies) for '{}' to {}", replacements, package, replacement);
        }

        EditResult {
            content,
            replacements,
        }
    }
}
