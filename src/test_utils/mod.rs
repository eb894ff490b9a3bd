//! Test utilities for conan-sync
//!
//! Helpers shared by unit tests and the integration suite:
//! - [`MockRegistry`], an in-memory [`JsonTransport`](crate::registry::JsonTransport)
//!   that records every request
//! - [`ProjectFixture`] for writing a manifest and lock file into a temp dir
//! - [`init_test_logging`] to see `tracing` output from a test
//!
//! # Example
//!
//! ```rust,no_run
//! use conan_sync::registry::{Registry, RegistryClient};
//! use conan_sync::test_utils::MockRegistry;
//! use serde_json::json;
//!
//! let registry = Registry::new("local", "https://conan.example.com");
//! let mock = MockRegistry::new()
//!     .with_search(&registry, "zlib", json!({ "results": ["zlib/1.3.1@_/_"] }));
//! let client = RegistryClient::with_transport(mock);
//! ```

pub mod fixtures;
pub mod mock_registry;

pub use fixtures::{ProjectFixture, lock_text, manifest_text};
pub use mock_registry::MockRegistry;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level`, that level is used;
/// otherwise `RUST_LOG` is honored, and without either nothing is logged.
///
/// ```bash
/// RUST_LOG=conan_sync=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
