//! Calendar-month partition key.
//!
//! Workout collections are persisted per (username, calendar month); chrono
//! has no year-month value type, so `MonthKey` fills that gap. A workout is
//! filed under the month of its start timestamp at creation time and is
//! never re-filed.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::errors::CoreError;

/// A calendar (year, month) pair. The persistence partition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Build a key from its parts.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `month` is not in `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::Validation(format!(
                "month must be 1..=12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The month a date falls in.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month a timestamp falls in.
    #[must_use]
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self::from_date(datetime.date())
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Midnight on the first day of the month. Used as the fallback start
    /// for legacy records that carry no timestamp.
    #[must_use]
    pub fn first_instant(self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or_default()
            .and_time(NaiveTime::MIN)
    }

    /// Whether a date falls inside this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::from_date(date) == self
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::Validation(format!("invalid month key '{s}' (expected YYYY-MM)"));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}
