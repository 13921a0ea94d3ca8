//! Shared utilities for CLI commands.

use anyhow::{Context, bail};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// Parse an instant given as RFC 3339 or as a local `HH:MM` clock time.
///
/// Clock times are taken on `day` in `tz`.
///
/// Supports:
/// - RFC 3339: "2025-03-10T09:15:00Z"
/// - Clock time: "09:15", "21:40"
pub fn parse_instant<Tz: TimeZone>(
    s: &str,
    day: NaiveDate,
    tz: &Tz,
) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Ok(instant.with_timezone(&Utc));
    }

    let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M") else {
        bail!("Invalid time: {s}. Use RFC 3339 (e.g., 2025-03-10T09:15:00Z) or HH:MM (e.g., 09:15)");
    };

    let local = tz
        .from_local_datetime(&day.and_time(time))
        .earliest()
        .with_context(|| format!("{s} does not exist on {day} in the local time zone"))?;
    Ok(local.with_timezone(&Utc))
}
