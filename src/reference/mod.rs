//! Package reference and lock entry grammars
//!
//! Two small string grammars are used throughout conan-sync:
//!
//! - A **package reference** identifies a package, version and namespace:
//!   `name/version@user/channel`. Packages in the default namespace use
//!   `_/_` as user and channel.
//! - A **lock entry** pins a reference to an immutable revision and records
//!   when that revision was published: `name/version#revision%timestamp`.
//!
//! Both grammars are pure: parsing never performs I/O, and building is the exact
//! inverse of parsing so `build(parse(s)) == s` for every accepted string.
//!
//! # Examples
//!
//! ```rust
//! use conan_sync::reference::{LockEntry, PackageReference};
//!
//! # fn example() -> anyhow::Result<()> {
//! let reference = PackageReference::parse("zlib/1.3.1@_/_")?;
//! assert!(reference.is_default_namespace());
//! assert_eq!(reference.to_string(), "zlib/1.3.1@_/_");
//!
//! let entry = LockEntry::parse("zlib/1.3.1#b8bc2603263cf7eccbd6e17e66b0ed76%1733936244.862")?;
//! assert_eq!(entry.version(), Some("1.3.1"));
//! # Ok(())
//! # }
//! ```

use crate::core::SyncError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Placeholder used for both user and channel of the default namespace.
pub const DEFAULT_NAMESPACE: &str = "_";

static REFERENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)/(.+?)@(.+?)/(.+?)$").expect("valid reference pattern"));

static LOCK_ENTRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^#]+)#([^%]+)%(.+)$").expect("valid lock entry pattern"));

/// A parsed `name/version@user/channel` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageReference {
    /// Package name
    pub name: String,
    /// Version string, as published
    pub version: String,
    /// Namespace user (`_` for the default namespace)
    pub user: String,
    /// Namespace channel (`_` for the default namespace)
    pub channel: String,
}

impl PackageReference {
    /// Parse a raw reference string.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MalformedReference`] when `input` is not of the form
    /// `name/version@user/channel`.
    pub fn parse(input: &str) -> Result<Self, SyncError> {
        let captures =
            REFERENCE_PATTERN.captures(input).ok_or_else(|| SyncError::MalformedReference {
                input: input.to_string(),
                expected: "name/version@user/channel".to_string(),
            })?;

        Ok(Self {
            name: captures[1].to_string(),
            version: captures[2].to_string(),
            user: captures[3].to_string(),
            channel: captures[4].to_string(),
        })
    }

    /// Build the reference string. Inverse of [`PackageReference::parse`].
    #[must_use]
    pub fn build(&self) -> String {
        format!("{}/{}@{}/{}", self.name, self.version, self.user, self.channel)
    }

    /// True for the `_/_` namespace.
    #[must_use]
    pub fn is_default_namespace(&self) -> bool {
        self.user == DEFAULT_NAMESPACE && self.channel == DEFAULT_NAMESPACE
    }

    /// Path segment identifying the namespace in registry browse URLs:
    /// `_` for the default namespace, otherwise the user.
    #[must_use]
    pub fn namespace_segment(&self) -> &str {
        if self.is_default_namespace() { DEFAULT_NAMESPACE } else { &self.user }
    }

    /// `name/version`, the part before `@`.
    #[must_use]
    pub fn package_path(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }

    /// `user/channel`, the part after `@`.
    #[must_use]
    pub fn user_channel(&self) -> String {
        format!("{}/{}", self.user, self.channel)
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

impl FromStr for PackageReference {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split a raw reference on its first `@` into `(package_path, user_channel)`.
///
/// Unlike [`PackageReference::parse`] this does not require either half to
/// contain a `/`; both halves only have to be non-empty.
///
/// # Errors
///
/// Returns [`SyncError::MalformedReference`] when there is no `@` or either half is empty.
pub fn split_reference(reference: &str) -> Result<(&str, &str), SyncError> {
    match reference.split_once('@') {
        Some((path, user_channel)) if !path.is_empty() && !user_channel.is_empty() => {
            Ok((path, user_channel))
        }
        _ => Err(SyncError::MalformedReference {
            input: reference.to_string(),
            expected: "package/version@user/channel".to_string(),
        }),
    }
}

/// A parsed `reference#revision%timestamp` lock entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEntry {
    /// Everything before `#`, normally `name/version`
    pub package_ref: String,
    /// Revision hash
    pub revision: String,
    /// `<unixSeconds>.<millis>` timestamp
    pub timestamp: String,
}

impl LockEntry {
    /// Create an entry from its three parts.
    pub fn new(
        package_ref: impl Into<String>,
        revision: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            package_ref: package_ref.into(),
            revision: revision.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Parse a lock entry string.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MalformedReference`] when `input` is not of the form
    /// `reference#revision%timestamp`.
    pub fn parse(input: &str) -> Result<Self, SyncError> {
        let captures =
            LOCK_ENTRY_PATTERN.captures(input).ok_or_else(|| SyncError::MalformedReference {
                input: input.to_string(),
                expected: "name/version#revision%timestamp".to_string(),
            })?;

        Ok(Self::new(&captures[1], &captures[2], &captures[3]))
    }

    /// Build the lock entry string. Inverse of [`LockEntry::parse`].
    #[must_use]
    pub fn build(&self) -> String {
        build_lock_entry(&self.package_ref, &self.revision, &self.timestamp)
    }

    /// Package name, the part of the reference before the first `/`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.package_ref.split_once('/').map_or(self.package_ref.as_str(), |(name, _)| name)
    }

    /// Version, between the first `/` and an optional `@`.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        let (_, rest) = self.package_ref.split_once('/')?;
        Some(rest.split_once('@').map_or(rest, |(version, _)| version))
    }
}

impl fmt::Display for LockEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

impl FromStr for LockEntry {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `"{package_ref}#{revision}%{timestamp}"`
#[must_use]
pub fn build_lock_entry(package_ref: &str, revision: &str, timestamp: &str) -> String {
    format!("{package_ref}#{revision}%{timestamp}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_namespace() {
        let reference = PackageReference::parse("fmt/10.2.1@_/_").unwrap();
        assert_eq!(reference.name, "fmt");
        assert_eq!(reference.version, "10.2.1");
        assert!(reference.is_default_namespace());
        assert_eq!(reference.namespace_segment(), "_");
        assert_eq!(reference.package_path(), "fmt/10.2.1");
        assert_eq!(reference.user_channel(), "_/_");
    }

    #[test]
    fn test_parse_named_namespace() {
        let reference: PackageReference = "openssl/3.2.0@acme/stable".parse().unwrap();
        assert_eq!(reference.user, "acme");
        assert_eq!(reference.channel, "stable");
        assert!(!reference.is_default_namespace());
        assert_eq!(reference.namespace_segment(), "acme");
    }

    #[test]
    fn test_half_default_namespace_is_named() {
        let reference = PackageReference::parse("boost/1.84.0@_/testing").unwrap();
        assert!(!reference.is_default_namespace());
        assert_eq!(reference.namespace_segment(), "_");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "fmt", "fmt/10.2.1", "fmt/10.2.1@", "fmt/10.2.1@_", "@_/_", "fmt@_/_"] {
            let err = PackageReference::parse(input).unwrap_err();
            assert!(
                matches!(err, SyncError::MalformedReference { .. }),
                "'{input}' should be malformed"
            );
        }
    }

    #[test]
    fn test_reference_round_trip() {
        for input in [
            "fmt/10.2.1@_/_",
            "openssl/3.2.0@acme/stable",
            "my-lib/1.0.0-rc.1+build.5@team/dev",
            "odd/1.0/extra@a/b/c",
        ] {
            let reference = PackageReference::parse(input).unwrap();
            assert_eq!(reference.build(), input);
            assert_eq!(PackageReference::parse(&reference.build()).unwrap(), reference);
        }
    }

    #[test]
    fn test_split_reference() {
        assert_eq!(split_reference("zlib/1.3.1@_/_").unwrap(), ("zlib/1.3.1", "_/_"));
        assert_eq!(split_reference("a/b@c/d@e").unwrap(), ("a/b", "c/d@e"));
        assert!(split_reference("zlib/1.3.1").is_err());
        assert!(split_reference("@_/_").is_err());
        assert!(split_reference("zlib/1.3.1@").is_err());
    }

    #[test]
    fn test_lock_entry_parse_and_accessors() {
        let entry = LockEntry::parse("zlib/1.3.1#b8bc2603263cf7eccbd6e17e66b0ed76%1733936244.862")
            .unwrap();
        assert_eq!(entry.package_ref, "zlib/1.3.1");
        assert_eq!(entry.revision, "b8bc2603263cf7eccbd6e17e66b0ed76");
        assert_eq!(entry.timestamp, "1733936244.862");
        assert_eq!(entry.name(), "zlib");
        assert_eq!(entry.version(), Some("1.3.1"));

        let scoped = LockEntry::parse("fmt/10.2.1@acme/stable#abc%1.000").unwrap();
        assert_eq!(scoped.version(), Some("10.2.1"));

        let bare = LockEntry::new("noslash", "abc", "1.000");
        assert_eq!(bare.name(), "noslash");
        assert_eq!(bare.version(), None);
    }

    #[test]
    fn test_lock_entry_rejects_malformed() {
        for input in ["zlib/1.3.1", "zlib/1.3.1#abc", "zlib/1.3.1%123", "#abc%123", "zlib/1.3.1#%1"]
        {
            assert!(LockEntry::parse(input).is_err(), "'{input}' should be malformed");
        }
    }

    #[test]
    fn test_lock_entry_round_trip() {
        for input in [
            "zlib/1.3.1#b8bc2603263cf7eccbd6e17e66b0ed76%1733936244.862",
            "fmt/10.2.1@acme/stable#0123%1757090078.826",
        ] {
            let entry = LockEntry::parse(input).unwrap();
            assert_eq!(entry.build(), input);
            assert_eq!(entry.to_string(), input);
        }

        assert_eq!(build_lock_entry("fmt/10.2.1", "abc", "1.002"), "fmt/10.2.1#abc%1.002");
    }
}
