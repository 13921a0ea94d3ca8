//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Minutes in a calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Well-known id of the open-ended "Other" category.
pub const OTHER_CATEGORY_ID: &str = "default-other";

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The block duration does not evenly divide a day into supported blocks.
    #[error("invalid block duration: {minutes} minutes (expected one of 15, 30, 60, 120)")]
    InvalidDuration { minutes: u32 },

    /// The period code is not one of the presets.
    #[error("unknown period: {value} (expected one of 1d, 3d, 1w, 1m)")]
    UnknownPeriod { value: String },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Wraps a non-empty literal without the runtime check.
            #[allow(dead_code)]
            pub(crate) fn from_static(id: &'static str) -> Self {
                debug_assert!(!id.is_empty());
                Self(id.to_string())
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated category identifier.
    ///
    /// Stock categories use stable `default-*` ids so they can be recognized
    /// across profiles.
    CategoryId, "category ID"
);

define_string_id!(
    /// A validated subcategory identifier, unique within its parent category.
    SubcategoryId, "subcategory ID"
);

define_string_id!(
    /// A validated time entry identifier.
    EntryId, "entry ID"
);

define_string_id!(
    /// A validated user identifier.
    UserId, "user ID"
);

impl CategoryId {
    /// Whether this is the open-ended "Other" bucket.
    pub fn is_other(&self) -> bool {
        self.0 == OTHER_CATEGORY_ID
    }
}

/// The length of a single time block.
///
/// Only divisors of a day that the tracker supports are representable, so
/// `MINUTES_PER_DAY / minutes` is always a whole number of blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BlockDuration {
    Fifteen,
    #[default]
    Thirty,
    Sixty,
    OneTwenty,
}

impl BlockDuration {
    /// Every supported duration, shortest first.
    pub const ALL: [Self; 4] = [Self::Fifteen, Self::Thirty, Self::Sixty, Self::OneTwenty];

    /// Block length in minutes.
    #[must_use]
    pub const fn minutes(self) -> u32 {
        match self {
            Self::Fifteen => 15,
            Self::Thirty => 30,
            Self::Sixty => 60,
            Self::OneTwenty => 120,
        }
    }

    /// Number of blocks that tile one day.
    #[must_use]
    pub const fn blocks_per_day(self) -> u32 {
        MINUTES_PER_DAY / self.minutes()
    }

    /// Block length as a `chrono` duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::minutes(i64::from(self.minutes()))
    }
}

impl TryFrom<u32> for BlockDuration {
    type Error = ValidationError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        match minutes {
            15 => Ok(Self::Fifteen),
            30 => Ok(Self::Thirty),
            60 => Ok(Self::Sixty),
            120 => Ok(Self::OneTwenty),
            _ => Err(ValidationError::InvalidDuration { minutes }),
        }
    }
}

impl From<BlockDuration> for u32 {
    fn from(duration: BlockDuration) -> Self {
        duration.minutes()
    }
}

impl fmt::Display for BlockDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.minutes())
    }
}

impl FromStr for BlockDuration {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Unparseable input is reported the same way as an unsupported value.
        let minutes = s.trim().parse::<u32>().unwrap_or(0);
        Self::try_from(minutes)
    }
}

/// Deserializes an optional string field, treating `""` as absent.
///
/// The wire format stores empty strings for "no subcategory", so validated
/// newtypes must not see them.
pub(crate) fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<String>,
    T::Error: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.is_empty() => T::try_from(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
