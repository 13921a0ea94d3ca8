//! Stats command: time per category over a period.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Result, bail};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use clap::Args;
use serde::Serialize;
use tb_core::format::format_minutes;
use tb_core::stats::Ranked;
use tb_core::{
    BlockDuration, CategoryStat, CategoryStats, DateRange, TimePeriod, calculate_category_stats,
};

use crate::{Config, Snapshot};

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Preset period ending today: 1d, 3d, 1w or 1m.
    #[arg(long, default_value_t = TimePeriod::Day, conflicts_with = "from")]
    pub period: TimePeriod,

    /// First day of a custom range (YYYY-MM-DD).
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last day of a custom range (YYYY-MM-DD).
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    /// Show the subcategory breakdown of one row (e.g. default-work, other-Reading).
    #[arg(long)]
    pub category: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatsArgs {
    /// The range to report on, relative to `today`.
    pub fn range(&self, today: NaiveDate) -> Result<DateRange> {
        let range = match (self.from, self.to) {
            (Some(from), Some(to)) => DateRange::new(from, to),
            _ => self.period.ending_on(today),
        };
        if range.is_empty() {
            bail!("--from {} is after --to {}", range.start, range.end);
        }
        Ok(range)
    }

    fn label(&self) -> &'static str {
        if self.from.is_some() {
            "Custom"
        } else {
            self.period.label()
        }
    }
}

/// JSON output structure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonStats<'a> {
    range: DateRange,
    total_minutes: f64,
    categories: &'a CategoryStats,
}

/// Computes statistics for `range` from the snapshot.
pub fn compute<Tz: TimeZone>(
    snapshot: &Snapshot,
    range: DateRange,
    duration: BlockDuration,
    tz: &Tz,
    now: DateTime<Utc>,
) -> CategoryStats {
    calculate_category_stats(
        &snapshot.entries,
        &snapshot.profile.categories,
        range,
        duration,
        tz,
        now,
    )
}

/// Format per-category totals for human-readable output.
pub fn format_stats(stats: &CategoryStats, range: DateRange, label: &str) -> String {
    let mut output = String::new();
    writeln!(output, "STATS ({label}: {} to {})", range.start, range.end).unwrap();
    writeln!(output).unwrap();

    if stats.is_empty() {
        writeln!(output, "No time logged in this period.").unwrap();
        return output;
    }

    write_rows(&mut output, &stats.ranked());
    writeln!(output, "{}", "─".repeat(40)).unwrap();
    writeln!(
        output,
        "{:<24}  {:>8}",
        "Total",
        format_minutes(stats.total_minutes())
    )
    .unwrap();
    output
}

/// Format one row's subcategory breakdown.
pub fn format_category(key: &str, row: &CategoryStat) -> String {
    let mut output = String::new();
    writeln!(output, "{} ({key})", row.name.to_uppercase()).unwrap();
    writeln!(output).unwrap();

    if row.subcategories.is_empty() {
        writeln!(output, "No subcategories.").unwrap();
    } else {
        write_rows(&mut output, &row.ranked_subcategories());
    }
    writeln!(output, "{}", "─".repeat(40)).unwrap();
    writeln!(output, "{:<24}  {:>8}", "Total", format_minutes(row.minutes)).unwrap();
    output
}

#[allow(clippy::cast_possible_truncation)]
fn write_rows<K>(output: &mut String, rows: &[Ranked<'_, K>]) {
    for row in rows {
        // Truncate by characters, not bytes, to avoid panics on multi-byte UTF-8
        let name = if row.name.chars().count() > 24 {
            format!("{}...", row.name.chars().take(21).collect::<String>())
        } else {
            row.name.to_string()
        };
        let percentage = row.percentage.round() as i64;
        writeln!(
            output,
            "{name:<24}  {:>8}  {percentage:>3}%",
            format_minutes(row.minutes)
        )
        .unwrap();
    }
}

/// Format statistics as JSON.
pub fn format_stats_json(stats: &CategoryStats, range: DateRange) -> Result<String> {
    let json = JsonStats {
        range,
        total_minutes: stats.total_minutes(),
        categories: stats,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

/// Runs the stats command.
pub fn run<W: Write>(writer: &mut W, args: &StatsArgs, config: &Config) -> Result<()> {
    let snapshot = Snapshot::load(&config.snapshot_path)?;
    let now = Utc::now();
    let range = args.range(now.with_timezone(&Local).date_naive())?;
    let stats = compute(&snapshot, range, snapshot.block_duration(config), &Local, now);

    match (&args.category, args.json) {
        (Some(key), json) => {
            let Some((_, row)) = stats.find(key) else {
                bail!("no time logged for {key} in this period");
            };
            if json {
                writeln!(writer, "{}", serde_json::to_string_pretty(row)?)?;
            } else {
                write!(writer, "{}", format_category(key, row))?;
            }
        }
        (None, true) => writeln!(writer, "{}", format_stats_json(&stats, range)?)?,
        (None, false) => write!(writer, "{}", format_stats(&stats, range, args.label()))?,
    }
    Ok(())
}
