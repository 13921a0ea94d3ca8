//! Logged time entries and their category tags.
//!
//! Entries arrive in one of two shapes: the current multi-category form with a
//! `categories` list, or the legacy flat `categoryId`/`subcategoryId` form.
//! Both are normalized into [`CategoryTags`] when deserialized and written
//! back in the shape they came in.

use std::slice;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::CategorySelection;
use crate::types::{CategoryId, EntryId, SubcategoryId, UserId, empty_as_none};

/// The category tags carried by an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryTags {
    /// One or more selections splitting the entry's time.
    Selections(Vec<CategorySelection>),
    /// A record written before multi-category support.
    Legacy(CategorySelection),
    /// No category information at all.
    Untagged,
}

impl CategoryTags {
    /// Picks the authoritative representation.
    ///
    /// A non-empty `categories` list wins over the legacy fields. A legacy
    /// record counts only if it names a category.
    pub fn from_parts(
        categories: Option<Vec<CategorySelection>>,
        category_id: Option<CategoryId>,
        subcategory_id: Option<SubcategoryId>,
        custom_subcategory: Option<String>,
    ) -> Self {
        match (categories, category_id) {
            (Some(selections), _) if !selections.is_empty() => Self::Selections(selections),
            (_, Some(category_id)) => Self::Legacy(CategorySelection {
                category_id,
                subcategory_id,
                custom_subcategory,
            }),
            _ => Self::Untagged,
        }
    }

    /// The selections these tags resolve to. Empty when untagged.
    pub fn selections(&self) -> &[CategorySelection] {
        match self {
            Self::Selections(selections) => selections.as_slice(),
            Self::Legacy(selection) => slice::from_ref(selection),
            Self::Untagged => &[],
        }
    }
}

/// A span of time the user logged against one or more categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireTimeEntry", into = "WireTimeEntry")]
pub struct TimeEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub tags: CategoryTags,
    pub note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TimeEntry {
    /// Creates an entry with no note.
    pub const fn new(
        id: EntryId,
        user_id: UserId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        tags: CategoryTags,
    ) -> Self {
        Self {
            id,
            user_id,
            start_time,
            end_time,
            tags,
            note: None,
            created_at: None,
        }
    }

    /// Whether the entry starts inside the half-open span `[start, end)`.
    pub fn starts_within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start <= self.start_time && self.start_time < end
    }
}

/// Resolves an entry's category selections, whatever shape it was stored in.
///
/// Every reader of an entry's categories goes through here so legacy and
/// multi-category records behave identically.
pub fn resolve_selections(entry: &TimeEntry) -> &[CategorySelection] {
    entry.tags.selections()
}

/// On-the-wire entry shape with both category representations.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTimeEntry {
    id: EntryId,
    user_id: UserId,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    categories: Option<Vec<CategorySelection>>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    category_id: Option<CategoryId>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    subcategory_id: Option<SubcategoryId>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    custom_subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl From<WireTimeEntry> for TimeEntry {
    fn from(wire: WireTimeEntry) -> Self {
        Self {
            id: wire.id,
            user_id: wire.user_id,
            start_time: wire.start_time,
            end_time: wire.end_time,
            tags: CategoryTags::from_parts(
                wire.categories,
                wire.category_id,
                wire.subcategory_id,
                wire.custom_subcategory,
            ),
            note: wire.note,
            created_at: wire.created_at,
        }
    }
}

impl From<TimeEntry> for WireTimeEntry {
    fn from(entry: TimeEntry) -> Self {
        let (categories, legacy) = match entry.tags {
            CategoryTags::Selections(selections) => (Some(selections), None),
            CategoryTags::Legacy(selection) => (None, Some(selection)),
            CategoryTags::Untagged => (None, None),
        };
        let (category_id, subcategory_id, custom_subcategory) = match legacy {
            Some(s) => (Some(s.category_id), s.subcategory_id, s.custom_subcategory),
            None => (None, None, None),
        };
        Self {
            id: entry.id,
            user_id: entry.user_id,
            start_time: entry.start_time,
            end_time: entry.end_time,
            categories,
            category_id,
            subcategory_id,
            custom_subcategory,
            note: entry.note,
            created_at: entry.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> TimeEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn modern_entry_resolves_its_list() {
        let entry = parse(
            r#"{
                "id": "e1", "userId": "u1",
                "startTime": "2025-03-10T09:00:00Z", "endTime": "2025-03-10T09:30:00Z",
                "categories": [
                    {"categoryId": "default-work", "subcategoryId": "default-work-deep"},
                    {"categoryId": "default-meal"}
                ]
            }"#,
        );
        let selections = resolve_selections(&entry);
        assert_eq!(selections.len(), 2);
        assert_eq!(selections[0].category_id.as_str(), "default-work");
        assert_eq!(selections[1].category_id.as_str(), "default-meal");
    }

    #[test]
    fn legacy_entry_synthesizes_single_selection() {
        let entry = parse(
            r#"{
                "id": "e1", "userId": "u1",
                "startTime": "2025-03-10T09:00:00Z", "endTime": "2025-03-10T09:30:00Z",
                "categoryId": "default-work", "subcategoryId": "", "customSubcategory": "Hiring"
            }"#,
        );
        assert!(matches!(entry.tags, CategoryTags::Legacy(_)));
        let selections = resolve_selections(&entry);
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].subcategory_id, None);
        assert_eq!(selections[0].custom_subcategory.as_deref(), Some("Hiring"));
    }

    #[test]
    fn list_takes_precedence_over_legacy_fields() {
        let entry = parse(
            r#"{
                "id": "e1", "userId": "u1",
                "startTime": "2025-03-10T09:00:00Z", "endTime": "2025-03-10T09:30:00Z",
                "categoryId": "default-work",
                "categories": [{"categoryId": "default-sleep"}]
            }"#,
        );
        let selections = resolve_selections(&entry);
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].category_id.as_str(), "default-sleep");
    }

    #[test]
    fn empty_list_falls_back_to_legacy() {
        let entry = parse(
            r#"{
                "id": "e1", "userId": "u1",
                "startTime": "2025-03-10T09:00:00Z", "endTime": "2025-03-10T09:30:00Z",
                "categoryId": "default-work", "categories": []
            }"#,
        );
        assert!(matches!(entry.tags, CategoryTags::Legacy(_)));
    }

    #[test]
    fn entry_without_categories_is_untagged() {
        let entry = parse(
            r#"{
                "id": "e1", "userId": "u1",
                "startTime": "2025-03-10T09:00:00Z", "endTime": "2025-03-10T09:30:00Z",
                "categoryId": ""
            }"#,
        );
        assert_eq!(entry.tags, CategoryTags::Untagged);
        assert!(resolve_selections(&entry).is_empty());
    }

    #[test]
    fn serialization_keeps_legacy_shape() {
        let json = r#"{"id":"e1","userId":"u1","startTime":"2025-03-10T09:00:00Z","endTime":"2025-03-10T09:30:00Z","categoryId":"default-work","subcategoryId":"default-work-admin"}"#;
        let entry = parse(json);
        assert_eq!(serde_json::to_string(&entry).unwrap(), json);
    }

    #[test]
    fn starts_within_is_half_open() {
        let entry = parse(
            r#"{"id":"e1","userId":"u1","startTime":"2025-03-10T09:30:00Z","endTime":"2025-03-10T10:00:00Z"}"#,
        );
        let nine: DateTime<Utc> = "2025-03-10T09:00:00Z".parse().unwrap();
        let nine_thirty: DateTime<Utc> = "2025-03-10T09:30:00Z".parse().unwrap();
        let ten: DateTime<Utc> = "2025-03-10T10:00:00Z".parse().unwrap();
        assert!(!entry.starts_within(nine, nine_thirty));
        assert!(entry.starts_within(nine_thirty, ten));
    }
}
