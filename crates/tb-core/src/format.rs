//! Human-readable durations and clock times.

use chrono::{DateTime, TimeZone, Utc};

use crate::types::BlockDuration;

/// Formats a minute total as `Xh Ym`, `Xh`, or `Ym`.
///
/// Fractional minutes from split blocks are rounded to the nearest minute.
/// Negative totals render as `0m`.
#[allow(clippy::cast_possible_truncation)]
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.round().max(0.0) as i64;
    let hours = total / 60;
    let minutes = total % 60;

    match (hours, minutes) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Short label for a block duration (`15 min`, `1 hr`).
pub fn duration_label(duration: BlockDuration) -> String {
    match duration.minutes() {
        m if m < 60 => format!("{m} min"),
        m => format!("{} hr", m / 60),
    }
}

/// Formats an instant as a 12-hour local clock time, e.g. `9:30 AM`.
pub fn format_time<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant.with_timezone(tz).format("%-I:%M %p").to_string()
}

/// Formats a span as `9:00 AM - 9:30 AM`.
pub fn format_time_range<Tz: TimeZone>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    tz: &Tz,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} - {}", format_time(start, tz), format_time(end, tz))
}
