//! Log command: tag the block containing a given time.
//!
//! Categories are given as `ID`, or `ID:DETAIL` where `DETAIL` names one of
//! the category's subcategories (by id or name) or is free text. Category
//! names are accepted in place of ids.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use clap::Args;
use tb_core::format::format_time_range;
use tb_core::{
    BlockDuration, Category, CategoryId, EntryId, LogAction, LogDraft, SubcategoryChoice,
    TimeEntry, find_category, generate_blocks,
};
use uuid::Uuid;

use crate::{Config, Snapshot};

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Time inside the block: RFC 3339, or HH:MM on --date.
    #[arg(long)]
    pub at: String,

    /// Day for an HH:MM time (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Category to log, as ID or ID:DETAIL. Repeat with different categories
    /// for split time.
    #[arg(long = "category", required_unless_present = "clear")]
    pub categories: Vec<String>,

    /// Note to attach. Keeps the existing note when editing without one.
    #[arg(long)]
    pub note: Option<String>,

    /// Remove the block's own entry instead of logging.
    #[arg(long, conflicts_with_all = ["categories", "note"])]
    pub clear: bool,
}

/// What a log invocation changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutcome {
    Created(TimeEntry),
    Updated(TimeEntry),
    Cleared(EntryId),
    NothingToClear,
}

/// A parsed `--category` value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CategoryArg<'a> {
    category: &'a str,
    detail: Option<&'a str>,
}

impl<'a> CategoryArg<'a> {
    fn parse(value: &'a str) -> Result<Self> {
        let (category, detail) = match value.split_once(':') {
            Some((category, detail)) => (category.trim(), Some(detail.trim())),
            None => (value.trim(), None),
        };
        if category.is_empty() {
            bail!("invalid category {value:?}: expected ID or ID:DETAIL");
        }
        Ok(Self {
            category,
            detail: detail.filter(|d| !d.is_empty()),
        })
    }
}

/// Resolves a category by id, falling back to a case-insensitive name match.
///
/// Unknown values are passed through as ids so the draft can reject them.
fn resolve_category<'c>(
    categories: &'c [Category],
    value: &str,
) -> Result<(CategoryId, Option<&'c Category>)> {
    let found = categories
        .iter()
        .find(|c| c.id.as_str() == value)
        .or_else(|| categories.iter().find(|c| c.name.eq_ignore_ascii_case(value)));
    match found {
        Some(category) => Ok((category.id.clone(), Some(category))),
        None => Ok((CategoryId::new(value)?, None)),
    }
}

fn subcategory_choice(category: Option<&Category>, detail: &str) -> SubcategoryChoice {
    category
        .and_then(|category| {
            category
                .subcategories
                .iter()
                .find(|s| s.id.as_str() == detail || s.name.eq_ignore_ascii_case(detail))
        })
        .map_or_else(
            || SubcategoryChoice::Custom(detail.to_string()),
            |s| SubcategoryChoice::Named(s.id.clone()),
        )
}

/// Applies a log request to the snapshot's entries.
///
/// `at` selects the block on its local day in `tz`.
pub fn apply<Tz: TimeZone>(
    snapshot: &mut Snapshot,
    args: &LogArgs,
    at: DateTime<Utc>,
    tz: &Tz,
    duration: BlockDuration,
    now: DateTime<Utc>,
) -> Result<LogOutcome> {
    let day = at.with_timezone(tz).date_naive();
    let blocks = generate_blocks(day, tz, duration, &snapshot.entries, now);
    let block = blocks
        .iter()
        .find(|block| block.start_time <= at && at < block.end_time)
        .with_context(|| format!("no block contains {at}"))?;

    if args.clear {
        return Ok(match block.own_entry().map(|entry| entry.id.clone()) {
            Some(id) => {
                snapshot.remove(&id);
                LogOutcome::Cleared(id)
            }
            None => LogOutcome::NothingToClear,
        });
    }

    let categories = &snapshot.profile.categories;
    let mut draft = LogDraft::open(block)?;
    let existing = block.own_entry().cloned();
    draft.clear();

    for value in &args.categories {
        let arg = CategoryArg::parse(value)?;
        let (id, category) = resolve_category(categories, arg.category)?;
        if draft.selections().iter().any(|s| s.category_id == id) {
            bail!("category {id} given more than once");
        }
        draft.toggle_category(id.clone());
        if let Some(detail) = arg.detail {
            if id.is_other() {
                draft.set_other_text(detail);
            } else {
                draft.set_subcategory(&id, subcategory_choice(category, detail));
            }
        }
    }

    let draft = draft.finish(categories)?;
    let action = draft.action.clone();
    let note = args
        .note
        .clone()
        .or_else(|| existing.as_ref().and_then(|entry| entry.note.clone()));
    let mut entry = draft.into_entry(
        EntryId::new(Uuid::new_v4().to_string())?,
        snapshot.profile.uid.clone(),
        note,
    );
    entry.created_at = existing.and_then(|e| e.created_at).or(Some(now));

    tracing::debug!(entry_id = %entry.id, ?action, "logging block");
    snapshot.upsert(entry.clone());
    Ok(match action {
        LogAction::Create => LogOutcome::Created(entry),
        LogAction::Update(_) => LogOutcome::Updated(entry),
    })
}

fn describe_entry(entry: &TimeEntry, categories: &[Category]) -> String {
    entry
        .tags
        .selections()
        .iter()
        .map(|selection| match find_category(categories, &selection.category_id) {
            Some(category) if selection.is_custom_other() => {
                selection.label(category).to_string()
            }
            Some(category) => match selection.detail(category) {
                Some(detail) => format!("{} · {detail}", category.name),
                None => category.name.clone(),
            },
            None => selection.category_id.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Runs the log command.
pub fn run<W: Write>(writer: &mut W, args: &LogArgs, config: &Config) -> Result<()> {
    let mut snapshot = Snapshot::load(&config.snapshot_path)?;
    let now = Utc::now();
    let day = args
        .date
        .unwrap_or_else(|| now.with_timezone(&Local).date_naive());
    let at = super::util::parse_instant(&args.at, day, &Local)?;
    let duration = snapshot.block_duration(config);

    let outcome = apply(&mut snapshot, args, at, &Local, duration, now)?;
    if outcome != LogOutcome::NothingToClear {
        snapshot.save(&config.snapshot_path)?;
    }

    let categories = &snapshot.profile.categories;
    let (verb, entry) = match outcome {
        LogOutcome::Created(entry) => ("Logged", entry),
        LogOutcome::Updated(entry) => ("Updated", entry),
        LogOutcome::Cleared(id) => {
            writeln!(writer, "Cleared entry {id}")?;
            return Ok(());
        }
        LogOutcome::NothingToClear => {
            writeln!(writer, "Nothing logged in that block")?;
            return Ok(());
        }
    };
    writeln!(
        writer,
        "{verb} {}: {}",
        format_time_range(entry.start_time, entry.end_time, &Local),
        describe_entry(&entry, categories)
    )?;
    Ok(())
}
