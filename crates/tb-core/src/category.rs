//! Activity categories and the selections that tag time entries.

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, SubcategoryId, empty_as_none};

/// Label used when a selection names neither a subcategory nor custom text.
pub const GENERAL_LABEL: &str = "General";

/// A named refinement of a category (e.g. "Meetings" under "Work").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub name: String,
}

/// A user-visible activity category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,

    /// Display token; never interpreted by the core.
    pub color: String,

    #[serde(default)]
    pub is_default: bool,

    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    /// Looks up a subcategory by id.
    pub fn subcategory(&self, id: &SubcategoryId) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| &s.id == id)
    }

    /// Whether this category is the "Other" bucket, by id or by name.
    ///
    /// Used for ordering only; aggregation keys off the id alone.
    pub fn is_other_bucket(&self) -> bool {
        self.id.is_other() || self.name.eq_ignore_ascii_case("other")
    }
}

/// Finds a category by id.
pub fn find_category<'a>(categories: &'a [Category], id: &CategoryId) -> Option<&'a Category> {
    categories.iter().find(|c| &c.id == id)
}

/// Stable-sorts categories so the "Other" bucket comes last.
pub fn order_other_last(categories: &mut [Category]) {
    categories.sort_by_key(Category::is_other_bucket);
}

/// One category tag on a time entry.
///
/// An entry may carry several selections to represent split or simultaneous
/// activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySelection {
    pub category_id: CategoryId,

    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub subcategory_id: Option<SubcategoryId>,

    /// Free text, used when no subcategory applies or for the "Other" bucket.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_subcategory: Option<String>,
}

impl CategorySelection {
    /// A bare selection of a category.
    pub const fn new(category_id: CategoryId) -> Self {
        Self {
            category_id,
            subcategory_id: None,
            custom_subcategory: None,
        }
    }

    #[must_use]
    pub fn with_subcategory(mut self, subcategory_id: SubcategoryId) -> Self {
        self.subcategory_id = Some(subcategory_id);
        self
    }

    /// Sets the free-text subcategory. Empty text clears it.
    #[must_use]
    pub fn with_custom(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.custom_subcategory = (!text.is_empty()).then_some(text);
        self
    }

    /// Whether this is an "Other" selection carrying its own description.
    pub fn is_custom_other(&self) -> bool {
        self.custom_subcategory.is_some() && self.category_id.is_other()
    }

    /// The selection's refinement text, if it has one.
    ///
    /// Prefers the named subcategory, then the custom text.
    pub fn detail<'a>(&'a self, category: &'a Category) -> Option<&'a str> {
        self.subcategory_id
            .as_ref()
            .and_then(|id| category.subcategory(id))
            .map(|s| s.name.as_str())
            .or(self.custom_subcategory.as_deref())
    }

    /// The selection's display label, falling back to [`GENERAL_LABEL`].
    pub fn label<'a>(&'a self, category: &'a Category) -> &'a str {
        self.detail(category).unwrap_or(GENERAL_LABEL)
    }
}
