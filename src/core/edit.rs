//! Result type shared by the text editors.

/// Outcome of patching a file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    /// Full text after the edit; identical to the input when nothing matched
    pub content: String,
    /// Number of places that were rewritten
    pub replacements: usize,
}

impl EditResult {
    /// True when at least one place matched.
    #[must_use]
    pub const fn matched(&self) -> bool {
        self.replacements > 0
    }
}
