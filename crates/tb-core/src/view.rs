//! What a day-grid row shows for one block.

use crate::blocks::TimeBlock;
use crate::category::{Category, find_category};

/// Display state of a single block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockStatus<'a> {
    /// The block carries an entry, its own or a continued one.
    Logged {
        /// Categories of the entry's selections that still exist.
        categories: Vec<&'a Category>,
        /// The single selection's label, or an activity count.
        detail: Option<String>,
        continued: bool,
        has_note: bool,
    },
    /// Elapsed with nothing logged or continued.
    Empty,
    /// Contains `now` and has no entry yet.
    Now,
    Upcoming,
}

/// Resolves what a block shows against the user's categories.
///
/// Selections naming a deleted category are left out of `categories` but
/// still count toward the activity total.
pub fn block_status<'a>(block: &TimeBlock<'a>, categories: &'a [Category]) -> BlockStatus<'a> {
    let Some(entry) = block.entry else {
        return if block.is_current {
            BlockStatus::Now
        } else if block.is_past {
            BlockStatus::Empty
        } else {
            BlockStatus::Upcoming
        };
    };

    let selections = block.selections();
    let resolved: Vec<&Category> = selections
        .iter()
        .filter_map(|selection| find_category(categories, &selection.category_id))
        .collect();

    let detail = match selections {
        [] => None,
        [single] => find_category(categories, &single.category_id)
            .and_then(|category| single.detail(category))
            .map(str::to_string),
        many => Some(format!("{} activities", many.len())),
    };

    BlockStatus::Logged {
        categories: resolved,
        detail,
        continued: block.is_continued,
        has_note: entry.note.as_deref().is_some_and(|note| !note.is_empty()),
    }
}
