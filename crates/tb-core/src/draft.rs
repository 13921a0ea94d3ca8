//! Drafting an entry for a block.
//!
//! [`LogDraft`] holds the selections being edited for one block and turns
//! them into an [`EntryDraft`] the caller persists.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::blocks::TimeBlock;
use crate::category::{Category, CategorySelection, find_category};
use crate::entry::{CategoryTags, TimeEntry};
use crate::types::{CategoryId, EntryId, SubcategoryId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("cannot log a block that has not started yet")]
    FutureBlock,

    #[error("select at least one category")]
    NoSelection,

    #[error("unknown category: {0}")]
    UnknownCategory(CategoryId),
}

/// Whether finishing a draft creates an entry or replaces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogAction {
    Create,
    Update(EntryId),
}

/// How a selection is refined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubcategoryChoice {
    Named(SubcategoryId),
    Custom(String),
    None,
}

/// Selections being edited for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDraft {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    editing: Option<EntryId>,
    selections: Vec<CategorySelection>,
}

impl LogDraft {
    /// Opens a draft for `block`.
    ///
    /// A block with its own entry is edited in place. Continued and empty
    /// blocks start from nothing.
    pub fn open(block: &TimeBlock<'_>) -> Result<Self, DraftError> {
        if !block.is_loggable() {
            return Err(DraftError::FutureBlock);
        }

        let own = block.own_entry();
        Ok(Self {
            start_time: block.start_time,
            end_time: block.end_time,
            editing: own.map(|entry| entry.id.clone()),
            selections: own.map_or_else(Vec::new, |entry| entry.tags.selections().to_vec()),
        })
    }

    pub fn selections(&self) -> &[CategorySelection] {
        &self.selections
    }

    pub const fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    /// Adds `category_id` if absent, otherwise removes it.
    ///
    /// A newly added "Other" selection starts with empty custom text.
    pub fn toggle_category(&mut self, category_id: CategoryId) {
        if let Some(index) = self.position(&category_id) {
            self.selections.remove(index);
            return;
        }
        let mut selection = CategorySelection::new(category_id);
        if selection.category_id.is_other() {
            selection.custom_subcategory = Some(String::new());
        }
        self.selections.push(selection);
    }

    /// Refines a selected category. Does nothing if it is not selected.
    pub fn set_subcategory(&mut self, category_id: &CategoryId, choice: SubcategoryChoice) {
        let Some(index) = self.position(category_id) else {
            return;
        };
        let selection = &mut self.selections[index];
        match choice {
            SubcategoryChoice::Named(id) => {
                selection.subcategory_id = Some(id);
                selection.custom_subcategory = None;
            }
            SubcategoryChoice::Custom(text) => {
                selection.subcategory_id = None;
                selection.custom_subcategory = Some(text);
            }
            SubcategoryChoice::None => {
                selection.subcategory_id = None;
                selection.custom_subcategory = None;
            }
        }
    }

    /// Sets the description of the "Other" selection, if selected.
    pub fn set_other_text(&mut self, text: impl Into<String>) {
        if let Some(selection) = self.selections.iter_mut().find(|s| s.category_id.is_other()) {
            selection.custom_subcategory = Some(text.into());
        }
    }

    /// Validates the draft against `categories`.
    ///
    /// Empty custom text is dropped.
    pub fn finish(self, categories: &[Category]) -> Result<EntryDraft, DraftError> {
        if self.selections.is_empty() {
            return Err(DraftError::NoSelection);
        }
        if let Some(unknown) = self
            .selections
            .iter()
            .find(|s| find_category(categories, &s.category_id).is_none())
        {
            return Err(DraftError::UnknownCategory(unknown.category_id.clone()));
        }

        let selections = self
            .selections
            .into_iter()
            .map(|mut selection| {
                selection.custom_subcategory =
                    selection.custom_subcategory.filter(|text| !text.trim().is_empty());
                selection
            })
            .collect();

        Ok(EntryDraft {
            action: self.editing.map_or(LogAction::Create, LogAction::Update),
            start_time: self.start_time,
            end_time: self.end_time,
            selections,
        })
    }

    fn position(&self, category_id: &CategoryId) -> Option<usize> {
        self.selections
            .iter()
            .position(|s| &s.category_id == category_id)
    }
}

/// A validated draft ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub action: LogAction,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub selections: Vec<CategorySelection>,
}

impl EntryDraft {
    /// Builds the entry to store, in the multi-category shape.
    ///
    /// Updates keep the edited entry's id; `id` is used only for creates.
    pub fn into_entry(self, id: EntryId, user_id: UserId, note: Option<String>) -> TimeEntry {
        let id = match self.action {
            LogAction::Create => id,
            LogAction::Update(existing) => existing,
        };
        let mut entry = TimeEntry::new(
            id,
            user_id,
            self.start_time,
            self.end_time,
            CategoryTags::Selections(self.selections),
        );
        entry.note = note.filter(|note| !note.is_empty());
        entry
    }
}
