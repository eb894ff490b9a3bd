//! Spinner shown while registry requests are in flight.
//!
//! Disabled spinners are backed by a hidden `indicatif` bar, so callers never
//! branch on `--quiet` / `--no-progress` themselves.
//!
//! ```rust
//! use conan_sync::utils::progress::Spinner;
//!
//! let spinner = Spinner::new(false, "Resolving zlib");
//! spinner.finish();
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
}

/// Indeterminate progress indicator on stderr.
#[derive(Clone)]
pub struct Spinner {
    inner: IndicatifBar,
}

impl Spinner {
    /// Start a spinner showing `msg`, or a hidden one when `enabled` is false.
    pub fn new(enabled: bool, msg: impl Into<String>) -> Self {
        let inner = if enabled {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            IndicatifBar::hidden()
        };
        inner.set_message(msg.into());
        Self {
            inner,
        }
    }

    /// Stop and erase the spinner.
    pub fn finish(&self) {
        self.inner.finish_and_clear();
    }

    /// Whether anything is drawn.
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_spinner_is_hidden() {
        let spinner = Spinner::new(false, "working");
        assert!(spinner.is_hidden());
        spinner.finish();
    }
}
