//! Calendar date ranges and the preset review periods.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// An inclusive range of calendar days.
///
/// A range whose start is after its end is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A range covering one day.
    pub const fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// Every day in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// Preset periods offered for reviewing statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimePeriod {
    #[default]
    Day,
    ThreeDays,
    Week,
    Month,
}

impl TimePeriod {
    pub const ALL: [Self; 4] = [Self::Day, Self::ThreeDays, Self::Week, Self::Month];

    /// Short code used on the command line (`1d`, `3d`, `1w`, `1m`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "1d",
            Self::ThreeDays => "3d",
            Self::Week => "1w",
            Self::Month => "1m",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Day => "1 Day",
            Self::ThreeDays => "3 Days",
            Self::Week => "1 Week",
            Self::Month => "1 Month",
        }
    }

    /// How many days before today the period starts.
    const fn days_back(self) -> i64 {
        match self {
            Self::Day => 0,
            Self::ThreeDays => 3,
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    /// The range this period covers, ending on `today`.
    pub fn ending_on(self, today: NaiveDate) -> DateRange {
        DateRange::new(today - Duration::days(self.days_back()), today)
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|period| period.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownPeriod {
                value: s.to_string(),
            })
    }
}
