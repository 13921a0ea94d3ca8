//! User profile settings.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::defaults::{default_categories, merge_missing_defaults};
use crate::types::{BlockDuration, UserId};

/// Per-user settings the core reads: block duration and categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: UserId,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub time_block_duration: BlockDuration,

    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub notifications_enabled: bool,
}

impl UserProfile {
    /// A fresh profile with the stock categories and 30-minute blocks.
    pub fn new(uid: UserId) -> Self {
        Self {
            uid,
            email: String::new(),
            display_name: String::new(),
            time_block_duration: BlockDuration::default(),
            categories: default_categories(),
            notifications_enabled: false,
        }
    }

    /// Adds stock categories the profile predates. Returns whether anything changed.
    pub fn merge_missing_defaults(&mut self) -> bool {
        let before = self.categories.len();
        self.categories = merge_missing_defaults(std::mem::take(&mut self.categories));
        self.categories.len() != before
    }
}
