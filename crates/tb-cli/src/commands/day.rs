//! Day command: one line per block of a day.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use clap::Args;
use serde::Serialize;
use tb_core::format::{duration_label, format_minutes, format_time};
use tb_core::{
    BlockDuration, BlockStatus, DateRange, TimeBlock, block_status, calculate_category_stats,
    generate_blocks,
};

use crate::{Config, Snapshot};

#[derive(Debug, Args)]
pub struct DayArgs {
    /// Day to show (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// JSON output structure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDay<'a> {
    date: NaiveDate,
    block_duration: BlockDuration,
    logged_minutes: f64,
    blocks: &'a [TimeBlock<'a>],
}

/// Renders the day grid.
pub fn format_day<Tz: TimeZone>(
    snapshot: &Snapshot,
    day: NaiveDate,
    duration: BlockDuration,
    tz: &Tz,
    now: DateTime<Utc>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let categories = &snapshot.profile.categories;
    let blocks = generate_blocks(day, tz, duration, &snapshot.entries, now);
    let logged = logged_minutes(snapshot, day, duration, tz, now);

    let mut output = String::new();
    writeln!(
        output,
        "{} ({} blocks)",
        day.format("%A, %B %-d, %Y"),
        duration_label(duration)
    )
    .unwrap();
    writeln!(output).unwrap();

    for block in &blocks {
        let marker = if block.is_current { '>' } else { ' ' };
        let time = format_time(block.start_time, tz);
        let line = format!("{marker} {time:>8}  {}", describe(&block_status(block, categories)));
        writeln!(output, "{}", line.trim_end()).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "Logged: {}", format_minutes(logged)).unwrap();
    output
}

/// Formats the day as JSON.
pub fn format_day_json<Tz: TimeZone>(
    snapshot: &Snapshot,
    day: NaiveDate,
    duration: BlockDuration,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Result<String> {
    let blocks = generate_blocks(day, tz, duration, &snapshot.entries, now);
    let json = JsonDay {
        date: day,
        block_duration: duration,
        logged_minutes: logged_minutes(snapshot, day, duration, tz, now),
        blocks: &blocks,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

fn logged_minutes<Tz: TimeZone>(
    snapshot: &Snapshot,
    day: NaiveDate,
    duration: BlockDuration,
    tz: &Tz,
    now: DateTime<Utc>,
) -> f64 {
    calculate_category_stats(
        &snapshot.entries,
        &snapshot.profile.categories,
        DateRange::single(day),
        duration,
        tz,
        now,
    )
    .total_minutes()
}

fn describe(status: &BlockStatus<'_>) -> String {
    match status {
        BlockStatus::Logged {
            categories,
            detail,
            continued,
            has_note,
        } => {
            let names = if categories.is_empty() {
                "(unknown)".to_string()
            } else {
                categories
                    .iter()
                    .map(|category| category.name.as_str())
                    .collect::<Vec<_>>()
                    .join(" + ")
            };
            let mut parts = vec![names];
            parts.extend(detail.clone());
            if *continued {
                parts.push("continued".to_string());
            }
            if *has_note {
                parts.push("note".to_string());
            }
            parts.join(" · ")
        }
        BlockStatus::Empty => "empty".to_string(),
        BlockStatus::Now => "now".to_string(),
        BlockStatus::Upcoming => String::new(),
    }
}

/// Runs the day command.
pub fn run<W: Write>(writer: &mut W, args: &DayArgs, config: &Config) -> Result<()> {
    let snapshot = Snapshot::load(&config.snapshot_path)?;
    let duration = snapshot.block_duration(config);
    let now = Utc::now();
    let day = args
        .date
        .unwrap_or_else(|| now.with_timezone(&Local).date_naive());

    if args.json {
        writeln!(writer, "{}", format_day_json(&snapshot, day, duration, &Local, now)?)?;
    } else {
        write!(writer, "{}", format_day(&snapshot, day, duration, &Local, now))?;
    }
    Ok(())
}
