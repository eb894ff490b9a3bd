//! Registry time → lock entry timestamp.
//!
//! Lock entries store publication time as `<unixSeconds>.<millis>` with the
//! milliseconds zero-padded to three digits, e.g. `1757090078.826`.

use chrono::{DateTime, FixedOffset, Utc};
use tracing::warn;

/// Layouts accepted besides RFC 3339 (which covers `Z` and `+08:00` offsets).
const OFFSET_LAYOUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"];

/// Parse a registry time string into milliseconds since the Unix epoch.
#[must_use]
pub fn parse_registry_time(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    parse_datetime(raw).map(|time| time.timestamp_millis())
}

fn parse_datetime(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time);
    }
    OFFSET_LAYOUTS.iter().find_map(|layout| DateTime::parse_from_str(raw, layout).ok())
}

/// Format epoch milliseconds as `<seconds>.<millis>`.
#[must_use]
pub fn format_millis(millis: i64) -> String {
    format!("{}.{:03}", millis.div_euclid(1000), millis.rem_euclid(1000))
}

/// Canonical lock timestamp for `raw`.
///
/// An unparsable `raw` falls back to the current wall-clock time so the lock
/// entry stays well-formed; a warning is logged.
#[must_use]
pub fn canonical_timestamp(raw: &str) -> String {
    match parse_registry_time(raw) {
        Some(millis) => format_millis(millis),
        None => {
            warn!("Unparsable registry time '{}', using the current time instead", raw);
            format_millis(Utc::now().timestamp_millis())
        }
    }
}
