// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validity windows and the remote service's timestamp format.

use crate::clock::Clock;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Timestamp format shared by the record store fields and the remote
/// participant's `validfrom`/`validuntil` properties.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Days a survey link stays usable when no explicit end was recorded.
const DEFAULT_VALID_DAYS: i64 = 30;

pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.format(DATETIME_FORMAT).to_string()
}

/// Parse a stored timestamp; malformed values yield `None` and are
/// treated by callers as "no usable date".
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).ok().map(|naive| naive.and_utc())
}

/// The `[validfrom, validuntil)` interval during which a participant's
/// survey link is usable, in stored string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityWindow {
    pub from: String,
    pub until: String,
}

impl ValidityWindow {
    /// Default window opening now: `[now, now + 30 days)`.
    pub fn starting_now(clock: &impl Clock) -> Self {
        let now = clock.now();
        Self { from: format_datetime(now), until: default_validuntil(now) }
    }

    /// Whether the window has closed. A malformed `until` never counts
    /// as expired.
    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        parse_datetime(&self.until).is_some_and(|until| until < now)
    }
}

/// Default `validfrom` fill value: now.
pub fn default_validfrom(now: DateTime<Utc>) -> String {
    format_datetime(now)
}

/// Default `validuntil` fill value: now plus 30 days.
pub fn default_validuntil(now: DateTime<Utc>) -> String {
    format_datetime(now + Duration::days(DEFAULT_VALID_DAYS))
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
