//! Version ordering for registry versions
//!
//! Conan versions are free-form strings, so ordering is done token by token rather
//! than with strict semantic versioning:
//!
//! 1. Both versions are split on `.` and `-` into tokens.
//! 2. Tokens are compared left to right. A missing trailing token counts as `0`.
//! 3. Two integer tokens compare numerically. An integer token ranks above a
//!    non-integer token. Two non-integer tokens compare as text using
//!    [`compare_text`].
//! 4. The first unequal token decides.
//!
//! Pre-release suffixes are plain tokens under these rules, so `1.0.0-beta` sorts
//! *below* `1.0.0` (the `0` vs `beta` position) and `1.0.0-rc.10` above
//! `1.0.0-rc.9`. Suffixes that are not "beta"/"rc"-like can produce orderings that
//! surprise semver users; that is accepted behavior.
//!
//! ```rust
//! use conan_sync::version::sort_newest_first;
//!
//! let mut versions = vec!["1.0.0", "1.0.10", "1.0.2", "1.0.0-beta"];
//! sort_newest_first(&mut versions, |v| *v);
//! assert_eq!(versions, ["1.0.10", "1.0.2", "1.0.0", "1.0.0-beta"]);
//! ```

use std::cmp::Ordering;

/// Token used in place of a missing trailing token.
const MISSING_TOKEN: &str = "0";

/// Compare two version strings, oldest first.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left: Vec<&str> = tokens(a).collect();
    let right: Vec<&str> = tokens(b).collect();

    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).copied().unwrap_or(MISSING_TOKEN);
        let r = right.get(i).copied().unwrap_or(MISSING_TOKEN);

        let ordering = compare_tokens(l, r);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

/// Sort `items` newest first by the version `key` extracts. The sort is stable,
/// so equal versions keep their input order.
pub fn sort_newest_first<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| compare_versions(key(b), key(a)));
}

fn tokens(version: &str) -> impl Iterator<Item = &str> {
    version.split(['.', '-'])
}

fn compare_tokens(a: &str, b: &str) -> Ordering {
    match (is_integer(a), is_integer(b)) {
        (true, true) => compare_integers(a, b),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => compare_text(a, b),
    }
}

fn is_integer(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Numeric order of two digit strings of any length.
fn compare_integers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Collation-style text comparison: letters compare case-insensitively first;
/// on a tie, lowercase sorts before uppercase (`"a" < "A" < "b"`).
#[must_use]
pub fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a.to_lowercase().cmp(&b.to_lowercase());
    if folded != Ordering::Equal {
        return folded;
    }

    for (x, y) in a.chars().zip(b.chars()) {
        if x != y {
            return match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => x.cmp(&y),
            };
        }
    }

    a.len().cmp(&b.len())
}
