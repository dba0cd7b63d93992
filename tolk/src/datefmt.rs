//! Timezone-aware date and time formatting.
//!
//! Conversion and pattern rendering are delegated to `chrono`/`chrono-tz`;
//! this module only picks the timezone (via the resolver) and the pattern
//! (via the facade's format table). Patterns are chrono `strftime`
//! patterns, so month and weekday names are not localized; full
//! CLDR-driven formatting is out of scope.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use log::warn;

use crate::context;
use crate::locale::Timezone;

/// Unit table for [`format_timedelta`], largest first: seconds per unit
/// and the English singular/plural names.
const TIMEDELTA_UNITS: &[(f64, &str, &str)] = &[
    (365.0 * 86_400.0, "year", "years"),
    (30.0 * 86_400.0, "month", "months"),
    (7.0 * 86_400.0, "week", "weeks"),
    (86_400.0, "day", "days"),
    (3_600.0, "hour", "hours"),
    (60.0, "minute", "minutes"),
    (1.0, "second", "seconds"),
];

/// Two-level pattern table.
///
/// A bare kind (`datetime`, `date`, `time`) maps to a style name; a
/// `kind.style` key (`datetime.long`) maps to a chrono pattern. Either
/// level can be overridden per facade, mirroring how an application swaps
/// a single style without redefining the rest.
#[derive(Debug, Clone)]
pub struct DateFormats {
    table: HashMap<String, String>,
}

impl Default for DateFormats {
    fn default() -> Self {
        let mut table = HashMap::new();
        for (key, value) in [
            ("datetime", "medium"),
            ("date", "medium"),
            ("time", "medium"),
            ("datetime.short", "%-m/%-d/%y, %-I:%M %p"),
            ("datetime.medium", "%b %-d, %Y, %-I:%M:%S %p"),
            ("datetime.long", "%B %-d, %Y at %-I:%M:%S %p %Z"),
            ("datetime.full", "%A, %B %-d, %Y at %-I:%M:%S %p %Z"),
            ("date.short", "%-m/%-d/%y"),
            ("date.medium", "%b %-d, %Y"),
            ("date.long", "%B %-d, %Y"),
            ("date.full", "%A, %B %-d, %Y"),
            ("time.short", "%-I:%M %p"),
            ("time.medium", "%-I:%M:%S %p"),
            ("time.long", "%-I:%M:%S %p %Z"),
            ("time.full", "%-I:%M:%S %p %Z"),
        ] {
            table.insert(key.to_owned(), value.to_owned());
        }
        Self { table }
    }
}

impl DateFormats {
    /// Override one entry; `key` is either a kind or a `kind.style` pair.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.table.insert(key.into(), value.into());
    }

    /// The configured entry for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.table.get(key).map(String::as_str)
    }

    fn pattern(&self, kind: &str, format: Option<&str>) -> String {
        let style_or_pattern = match format {
            Some(explicit) => explicit.to_owned(),
            None => self
                .table
                .get(kind)
                .cloned()
                .unwrap_or_else(|| "medium".to_owned()),
        };
        if matches!(
            style_or_pattern.as_str(),
            "short" | "medium" | "long" | "full"
        ) {
            let key = format!("{kind}.{style_or_pattern}");
            if let Some(pattern) = self.table.get(&key) {
                return pattern.clone();
            }
        }
        style_or_pattern
    }
}

/// Convert a UTC instant into the timezone resolved for the current
/// request. Outside a scope, or when resolution fails, this is UTC.
pub fn to_user_timezone(datetime: DateTime<Utc>) -> DateTime<Tz> {
    let timezone = crate::get_timezone().unwrap_or_else(|err| {
        warn!("timezone resolution failed: {err}; falling back to UTC");
        Timezone::default()
    });
    datetime.with_timezone(&timezone.tz())
}

/// Format a UTC instant in the resolved timezone.
///
/// `format` is a style name (`short`, `medium`, `long`, `full`), an
/// explicit chrono pattern, or `None` for the facade's configured default
/// style.
pub fn format_datetime(datetime: DateTime<Utc>, format: Option<&str>) -> String {
    format_kind("datetime", datetime, format)
}

/// Format the date part of a UTC instant in the resolved timezone.
pub fn format_date(datetime: DateTime<Utc>, format: Option<&str>) -> String {
    format_kind("date", datetime, format)
}

/// Format the time part of a UTC instant in the resolved timezone.
pub fn format_time(datetime: DateTime<Utc>, format: Option<&str>) -> String {
    format_kind("time", datetime, format)
}

/// Format a duration as its single largest fitting unit (`1 week`,
/// `6 days`).
///
/// `threshold` is the fraction of a unit the duration must reach for that
/// unit to be chosen; `None` uses the conventional 0.85, so six days
/// already reads as `1 week` while `Some(1.0)` keeps it at `6 days`.
/// Negative durations format by magnitude. Unit names are English, like
/// the rest of this module's pattern output.
pub fn format_timedelta(delta: Duration, threshold: Option<f64>) -> String {
    let threshold = threshold.unwrap_or(0.85);
    let seconds = delta.num_seconds().abs() as f64;
    for &(unit_seconds, singular, plural) in TIMEDELTA_UNITS {
        let value = seconds / unit_seconds;
        if value >= threshold {
            let rounded = value.round() as i64;
            let unit = if rounded == 1 { singular } else { plural };
            return format!("{rounded} {unit}");
        }
    }
    "0 seconds".to_owned()
}

fn format_kind(kind: &str, datetime: DateTime<Utc>, format: Option<&str>) -> String {
    let formats = context::with_scope(|scope| scope.tolk().date_formats()).unwrap_or_default();
    let pattern = formats.pattern(kind, format);
    to_user_timezone(datetime).format(&pattern).to_string()
}
