//! Core types shared by every conan-sync module
//!
//! - [`SyncError`] is the error taxonomy, rendered for users by
//!   [`ErrorContext`] and [`user_friendly_error`]
//! - [`EditResult`] is what the manifest and lock file editors return

pub mod edit;
pub mod error;

pub use edit::EditResult;
pub use error::{ErrorContext, SyncError, user_friendly_error};
