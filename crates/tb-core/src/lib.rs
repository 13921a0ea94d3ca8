//! Core domain logic for the time block tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Block generation: tiling a day into fixed blocks and continuing entries
//! - Selection resolution: reading legacy and multi-category entries alike
//! - Aggregation: per-category and per-subcategory time over a date range
//!
//! Everything here is pure. Callers pass in the time zone and `now`.

pub mod blocks;
pub mod category;
mod defaults;
pub mod draft;
pub mod entry;
pub mod format;
pub mod period;
mod profile;
pub mod stats;
mod types;
pub mod view;

pub use blocks::{TimeBlock, continue_entries, day_start, generate_blocks};
pub use category::{
    Category, CategorySelection, GENERAL_LABEL, Subcategory, find_category, order_other_last,
};
pub use defaults::{default_categories, merge_missing_defaults};
pub use draft::{DraftError, EntryDraft, LogAction, LogDraft, SubcategoryChoice};
pub use entry::{CategoryTags, TimeEntry, resolve_selections};
pub use period::{DateRange, TimePeriod};
pub use profile::UserProfile;
pub use stats::{CategoryStat, CategoryStats, StatsKey, calculate_category_stats};
pub use types::{
    BlockDuration, CategoryId, EntryId, MINUTES_PER_DAY, OTHER_CATEGORY_ID, SubcategoryId,
    UserId, ValidationError,
};
pub use view::{BlockStatus, block_status};
