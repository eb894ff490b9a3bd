//! Error handling for conan-sync
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`SyncError`]) for the failure modes callers branch on
//! 2. **User-friendly messages** ([`ErrorContext`]) with suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Grammar**: [`SyncError::MalformedReference`] when a package reference or lock
//!   entry does not match its grammar
//! - **Registry**: [`SyncError::VersionNotFound`], [`SyncError::NetworkFailure`],
//!   [`SyncError::HttpStatus`], [`SyncError::InvalidResponse`]
//! - **Project files**: [`SyncError::FileNotFound`] when the manifest or lock file is missing
//! - **Configuration**: [`SyncError::ConfigError`], [`SyncError::RegistryNotFound`]
//!
//! Discovery paths (listing versions) degrade network failures to empty results and
//! only log them. Single-reference paths and file validation surface these errors.
//!
//! # Examples
//!
//! ```rust,no_run
//! use conan_sync::core::{SyncError, user_friendly_error};
//!
//! let error = SyncError::FileNotFound {
//!     files: vec!["conan.lock".to_string()],
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for conan-sync operations.
///
/// Variants carry enough context (inputs, URLs, file names) to render a useful
/// message without the caller re-attaching it.
#[derive(Error, Debug, Clone)]
pub enum SyncError {
    /// A string did not match the reference or lock-entry grammar
    #[error("Malformed reference '{input}': expected {expected}")]
    MalformedReference {
        /// The offending input
        input: String,
        /// Human-readable description of the expected shape
        expected: String,
    },

    /// The requested version is not published on the registry
    #[error("Version '{version}' not found for package '{package}'")]
    VersionNotFound {
        /// Package name
        package: String,
        /// Version that was requested
        version: String,
    },

    /// One or more project files are missing
    #[error("Required file(s) not found: {}", .files.join(", "))]
    FileNotFound {
        /// Names of the missing files
        files: Vec<String>,
    },

    /// The request could not be delivered or the body could not be read
    #[error("Network request to {url} failed: {reason}")]
    NetworkFailure {
        /// Requested URL
        url: String,
        /// Transport error description
        reason: String,
    },

    /// The registry answered with a non-success status
    #[error("Registry returned HTTP {status} for {url}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The registry answered with JSON of an unexpected shape
    #[error("Unexpected response from {url}: {reason}")]
    InvalidResponse {
        /// Requested URL
        url: String,
        /// Deserialization error
        reason: String,
    },

    /// Configuration file could not be used
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// A registry name was requested that the configuration does not define
    #[error("Registry '{name}' is not configured")]
    RegistryNotFound {
        /// Requested registry name
        name: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error wrapper that adds a suggestion and details for display.
///
/// ```rust,no_run
/// use conan_sync::core::{ErrorContext, SyncError};
///
/// let context = ErrorContext::new(SyncError::RegistryNotFound { name: "corp".into() })
///     .with_suggestion("Add a [registries.corp] table to your config file");
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: SyncError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details.
    #[must_use]
    pub const fn new(error: SyncError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with suggestions.
///
/// [`SyncError`] values anywhere in the chain get tailored suggestions. IO errors
/// and everything else are shown with their full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(sync_error) = error.chain().find_map(|e| e.downcast_ref::<SyncError>()) {
        return create_error_context(sync_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(SyncError::Other {
                message: error.to_string(),
            })
            .with_suggestion("Check the ownership and permissions of the project files");
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(SyncError::Other {
        message,
    })
}

fn create_error_context(error: SyncError) -> ErrorContext {
    match &error {
        SyncError::MalformedReference {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Package references look like 'name/version@user/channel'")
            .with_details("Use '_/_' as user/channel for packages in the default namespace"),
        SyncError::VersionNotFound {
            package,
            ..
        } => {
            let suggestion = format!("Run 'conan-sync versions {package}' to list published versions");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        SyncError::FileNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run the command from the project root or pass --project-dir")
            .with_details("Both the manifest and the lock file must exist before packages are updated"),
        SyncError::NetworkFailure {
            ..
        }
        | SyncError::HttpStatus {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the registry URL and your network connection")
            .with_details("Requests are attempted once and are not retried"),
        SyncError::InvalidResponse {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Verify that the registry URL points at a Conan v2 API endpoint"),
        SyncError::ConfigError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the TOML syntax of your conan-sync config file"),
        SyncError::RegistryNotFound {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Define the registry under [registries] in the config file or pass --registry-url",
        ),
        SyncError::Other {
            ..
        } => ErrorContext::new(error),
    }
}
