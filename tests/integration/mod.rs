//! Integration test suite for conan-sync
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **reconcile**: end-to-end reconciliation against an in-memory registry
//! - **resolution**: version and revision resolution through the public API
//! - **cli**: the `conan-sync` binary, offline paths only
//!
//! Registry traffic goes through `conan_sync::test_utils::MockRegistry`; no
//! test talks to a real registry.

mod cli;
mod reconcile;
mod resolution;

use conan_sync::registry::Registry;
use conan_sync::test_utils::MockRegistry;
use serde_json::json;

pub fn registry() -> Registry {
    Registry::new("local", "https://conan.example.com/artifactory/api/conan/conan-local")
}

/// Registry publishing `zlib` 1.2.13 and 1.3.1 (newest, revision `rev131`).
pub fn zlib_registry() -> MockRegistry {
    MockRegistry::new()
        .with_search(
            &registry(),
            "zlib",
            json!({ "results": ["zlib/1.2.13@_/_", "zlib/1.3.1@_/_", "zlibng/2.2.1@_/_"] }),
        )
        .with_revisions(
            &registry(),
            "zlib/1.3.1",
            "_/_",
            json!({
                "reference": "zlib/1.3.1@_/_",
                "revisions": [
                    { "revision": "rev131", "time": "2025-09-06T00:34:38.826+0800" },
                    { "revision": "rev131-old", "time": "2024-01-01T00:00:00Z" }
                ]
            }),
        )
        .with_revisions(
            &registry(),
            "zlib/1.2.13",
            "_/_",
            json!({
                "reference": "zlib/1.2.13@_/_",
                "revisions": [{ "revision": "rev1213", "time": "2023-10-01T12:00:00.000+0000" }]
            }),
        )
}
