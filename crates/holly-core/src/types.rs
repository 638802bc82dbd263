//! Core domain types shared across the Holly crates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One named holiday in the catalog year.
///
/// `date` is the `MM-DD` rendering of `month` and `day`; the catalog loader
/// rejects records where the two disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRecord {
    pub name: String,
    pub month: u32,
    pub day: u32,
    pub date: String,
}

impl HolidayRecord {
    /// Build a record, deriving `date` from `month` and `day`.
    pub fn new(name: impl Into<String>, month: u32, day: u32) -> Self {
        Self {
            name: name.into(),
            month,
            day,
            date: format!("{:02}-{:02}", month, day),
        }
    }

    /// The holiday's date in `year`, or `None` when the month/day does not
    /// exist that year (Feb 29 outside leap years).
    pub fn date_in(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }

    /// Sort key used for the catalog's chronological ordering.
    pub fn month_day(&self) -> (u32, u32) {
        (self.month, self.day)
    }
}
