//! Stock categories every profile starts with.

use std::collections::HashSet;

use crate::category::{Category, Subcategory};
use crate::types::{CategoryId, SubcategoryId};

type StockCategory = (
    &'static str,
    &'static str,
    &'static str,
    &'static [(&'static str, &'static str)],
);

const STOCK: &[StockCategory] = &[
    (
        "default-work",
        "Work",
        "#3b82f6",
        &[
            ("default-work-deep", "Deep Work"),
            ("default-work-meetings", "Meetings"),
            ("default-work-email", "Email/Messages"),
            ("default-work-admin", "Admin"),
        ],
    ),
    (
        "default-school",
        "School",
        "#8b5cf6",
        &[
            ("default-school-class", "Class"),
            ("default-school-study", "Studying"),
            ("default-school-homework", "Homework"),
        ],
    ),
    ("default-sleep", "Sleep", "#6366f1", &[]),
    ("default-meal", "Meal", "#f59e0b", &[]),
    ("default-exercise", "Exercise", "#ef4444", &[]),
    ("default-social", "Social", "#22c55e", &[]),
    ("default-leisure", "Leisure", "#ec4899", &[]),
    (
        "default-hobbies",
        "Hobbies",
        "#14b8a6",
        &[
            ("default-hobbies-gaming", "Gaming"),
            ("default-hobbies-reading", "Reading"),
            ("default-hobbies-music", "Music"),
            ("default-hobbies-art", "Art/Crafts"),
        ],
    ),
    (
        "default-projects",
        "Projects",
        "#06b6d4",
        &[
            ("default-projects-side", "Side Project"),
            ("default-projects-learning", "Learning"),
            ("default-projects-creative", "Creative"),
        ],
    ),
    (
        "default-personal",
        "Personal",
        "#f97316",
        &[
            ("default-personal-chores", "Chores"),
            ("default-personal-errands", "Errands"),
            ("default-personal-commute", "Commute"),
            ("default-personal-selfcare", "Self-care"),
        ],
    ),
    ("default-other", "Other", "#64748b", &[]),
];

/// Returns the stock categories, "Other" last.
pub fn default_categories() -> Vec<Category> {
    STOCK
        .iter()
        .map(|&(id, name, color, subcategories)| Category {
            id: CategoryId::from_static(id),
            name: name.to_string(),
            color: color.to_string(),
            is_default: true,
            subcategories: subcategories
                .iter()
                .map(|&(id, name)| Subcategory {
                    id: SubcategoryId::from_static(id),
                    name: name.to_string(),
                })
                .collect(),
        })
        .collect()
}

/// Adds any stock category the profile is missing.
///
/// Existing categories keep their order and content. New stock categories are
/// appended before the "Other" bucket, which always ends the list. When nothing
/// is missing the input is returned unchanged.
pub fn merge_missing_defaults(existing: Vec<Category>) -> Vec<Category> {
    let known: HashSet<_> = existing.iter().map(|c| c.id.clone()).collect();
    let missing: Vec<_> = default_categories()
        .into_iter()
        .filter(|c| !known.contains(&c.id))
        .collect();

    if missing.is_empty() {
        return existing;
    }
    tracing::debug!(count = missing.len(), "adding missing stock categories");

    let (mut other, mut merged): (Vec<_>, Vec<_>) =
        existing.into_iter().partition(|c| c.id.is_other());
    let (missing_other, missing_rest): (Vec<_>, Vec<_>) =
        missing.into_iter().partition(|c| c.id.is_other());

    merged.extend(missing_rest);
    if other.is_empty() {
        other = missing_other;
    }
    merged.extend(other);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(categories: &[Category]) -> Vec<&str> {
        categories.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn stock_set_ends_with_other() {
        let categories = default_categories();
        assert_eq!(categories.len(), 11);
        assert!(categories.last().unwrap().id.is_other());
        assert!(categories.iter().all(|c| c.is_default));
    }

    #[test]
    fn stock_subcategory_ids_are_unique_per_category() {
        for category in default_categories() {
            let unique: HashSet<_> = category.subcategories.iter().map(|s| &s.id).collect();
            assert_eq!(unique.len(), category.subcategories.len(), "{}", category.id);
        }
    }

    #[test]
    fn merge_is_noop_when_complete() {
        let mut existing = default_categories();
        existing[0].name = "Job".to_string();
        let merged = merge_missing_defaults(existing.clone());
        assert_eq!(merged, existing);
    }

    #[test]
    fn merge_appends_missing_before_other() {
        let mut existing = default_categories();
        existing.retain(|c| c.id.as_str() != "default-meal" && c.id.as_str() != "default-sleep");
        existing.push(Category {
            id: CategoryId::new("custom-garden").unwrap(),
            name: "Garden".to_string(),
            color: "#84cc16".to_string(),
            is_default: false,
            subcategories: vec![],
        });

        let merged = merge_missing_defaults(existing);
        let ids = ids(&merged);
        assert_eq!(ids.len(), 12);
        assert_eq!(
            &ids[8..],
            ["custom-garden", "default-sleep", "default-meal", "default-other"]
        );
    }

    #[test]
    fn merge_keeps_existing_other_content() {
        let mut existing = vec![Category {
            id: CategoryId::new("default-other").unwrap(),
            name: "Misc".to_string(),
            color: "#000000".to_string(),
            is_default: true,
            subcategories: vec![],
        }];
        existing.insert(0, default_categories().remove(0));

        let merged = merge_missing_defaults(existing);
        let other = merged.last().unwrap();
        assert!(other.id.is_other());
        assert_eq!(other.name, "Misc");
        assert_eq!(merged.iter().filter(|c| c.id.is_other()).count(), 1);
    }

    #[test]
    fn merge_from_empty_yields_stock_set() {
        assert_eq!(merge_missing_defaults(Vec::new()), default_categories());
    }
}
