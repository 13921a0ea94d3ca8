//! Category statistics over a date range.
//!
//! Statistics are computed from the same blocks the day view shows, so
//! continued time counts exactly as it is displayed. Only elapsed blocks
//! contribute. A block tagged with `n` categories gives each of them
//! `duration / n` minutes.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Serialize, Serializer};

use crate::blocks::{day_start, generate_blocks};
use crate::category::{Category, CategorySelection, find_category};
use crate::entry::TimeEntry;
use crate::period::DateRange;
use crate::types::{BlockDuration, CategoryId, SubcategoryId};

/// Identity of one statistics row, as rendered in output.
///
/// A category's row is keyed by its id. "Other" time with a description is
/// keyed `other-<text>`, so each text is its own row. Keys that render alike
/// share a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StatsKey(String);

impl StatsKey {
    pub fn category(id: &CategoryId) -> Self {
        Self(id.to_string())
    }

    pub fn custom_other(text: &str) -> Self {
        Self(format!("other-{text}"))
    }
}

impl fmt::Display for StatsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for StatsKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identity of a subcategory within a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubcategoryKey {
    Subcategory(SubcategoryId),
    /// Selections without a subcategory id.
    General,
}

impl fmt::Display for SubcategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subcategory(id) => write!(f, "{id}"),
            Self::General => f.write_str("general"),
        }
    }
}

impl Serialize for SubcategoryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryStat {
    pub name: String,
    pub minutes: f64,
}

/// Accumulated time for one statistics row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub name: String,
    pub color: String,
    pub minutes: f64,
    pub subcategories: BTreeMap<SubcategoryKey, SubcategoryStat>,
}

/// A row or subcategory with its share of the enclosing total.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<'a, K> {
    pub key: &'a K,
    pub name: &'a str,
    pub minutes: f64,
    /// Percentage of the enclosing total; 0 when that total is 0.
    pub percentage: f64,
}

impl CategoryStat {
    /// Subcategories, largest first.
    pub fn ranked_subcategories(&self) -> Vec<Ranked<'_, SubcategoryKey>> {
        rank(
            self.subcategories
                .iter()
                .map(|(key, stat)| (key, stat.name.as_str(), stat.minutes)),
            self.minutes,
        )
    }
}

/// Per-category totals keyed by [`StatsKey`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategoryStats {
    rows: BTreeMap<StatsKey, CategoryStat>,
}

impl CategoryStats {
    /// Looks a row up by its key (`default-work`, `other-Reading`).
    pub fn find(&self, key: &str) -> Option<(&StatsKey, &CategoryStat)> {
        self.rows.get_key_value(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_minutes(&self) -> f64 {
        self.rows.values().map(|row| row.minutes).sum()
    }

    /// Rows, largest first, with their share of the overall total.
    pub fn ranked(&self) -> Vec<Ranked<'_, StatsKey>> {
        rank(
            self.rows
                .iter()
                .map(|(key, row)| (key, row.name.as_str(), row.minutes)),
            self.total_minutes(),
        )
    }

    fn add(&mut self, selection: &CategorySelection, categories: &[Category], minutes: f64) {
        let Some(category) = find_category(categories, &selection.category_id) else {
            tracing::trace!(
                category_id = %selection.category_id,
                "dropping time for unknown category"
            );
            return;
        };

        let custom_other = selection
            .is_custom_other()
            .then_some(selection.custom_subcategory.as_deref())
            .flatten();
        let (key, name) = match custom_other {
            Some(text) => (StatsKey::custom_other(text), text),
            None => (StatsKey::category(&category.id), category.name.as_str()),
        };

        let row = self.rows.entry(key).or_insert_with(|| CategoryStat {
            name: name.to_string(),
            color: category.color.clone(),
            minutes: 0.0,
            subcategories: BTreeMap::new(),
        });
        row.minutes += minutes;

        if custom_other.is_some() {
            return;
        }

        let sub_key = selection
            .subcategory_id
            .clone()
            .map_or(SubcategoryKey::General, SubcategoryKey::Subcategory);
        row.subcategories
            .entry(sub_key)
            .or_insert_with(|| SubcategoryStat {
                name: selection.label(category).to_string(),
                minutes: 0.0,
            })
            .minutes += minutes;
    }
}

fn rank<'a, K: 'a>(
    items: impl Iterator<Item = (&'a K, &'a str, f64)>,
    total: f64,
) -> Vec<Ranked<'a, K>> {
    let mut ranked: Vec<_> = items
        .map(|(key, name, minutes)| Ranked {
            key,
            name,
            minutes,
            percentage: if total > 0.0 {
                minutes / total * 100.0
            } else {
                0.0
            },
        })
        .collect();
    ranked.sort_by(|a, b| b.minutes.total_cmp(&a.minutes));
    ranked
}

/// Minutes each selection receives from one block.
#[allow(clippy::cast_precision_loss)]
fn share_per_selection(duration: BlockDuration, selections: usize) -> f64 {
    f64::from(duration.minutes()) / selections as f64
}

/// Totals elapsed time per category across every day of `range`.
///
/// Days are generated independently, so continuation does not cross midnight.
/// Selections naming a category missing from `categories` are dropped.
pub fn calculate_category_stats<Tz: TimeZone>(
    entries: &[TimeEntry],
    categories: &[Category],
    range: DateRange,
    duration: BlockDuration,
    tz: &Tz,
    now: DateTime<Utc>,
) -> CategoryStats {
    let mut stats = CategoryStats::default();

    for day in range.days() {
        let start = day_start(day, tz);
        let end = day_start(day + Duration::days(1), tz);
        let day_entries: Vec<TimeEntry> = entries
            .iter()
            .filter(|entry| entry.starts_within(start, end))
            .cloned()
            .collect();

        let blocks = generate_blocks(day, tz, duration, &day_entries, now);
        for block in blocks.iter().filter(|block| block.is_past) {
            let selections = block.selections();
            if selections.is_empty() {
                continue;
            }
            let minutes = share_per_selection(duration, selections.len());
            for selection in selections {
                stats.add(selection, categories, minutes);
            }
        }
    }

    tracing::debug!(
        start = %range.start,
        end = %range.end,
        rows = stats.len(),
        total_minutes = stats.total_minutes(),
        "calculated category stats"
    );
    stats
}
