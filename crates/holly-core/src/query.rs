//! Holiday query engine.
//!
//! Pure functions over a [`HolidayCatalog`] and a date. Nothing here reads
//! the clock; callers pass `today` in.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::catalog::HolidayCatalog;
use crate::types::HolidayRecord;

/// Result of a next-holiday search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextHoliday<'a> {
    pub record: &'a HolidayRecord,
    /// The holiday's resolved date, in next year when `wrapped`.
    pub date: NaiveDate,
    /// True when no holiday remained this year and the search wrapped to
    /// the first holiday of the following year.
    pub wrapped: bool,
}

/// Holidays later in the year than a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemainingHolidays {
    pub names: Vec<String>,
    pub count: usize,
}

/// Find the first holiday strictly after `today`.
///
/// Scans in catalog order. When every holiday this year is on or before
/// `today`, returns the catalog's first record dated in `today.year() + 1`.
/// Records whose month/day does not exist in the target year are skipped.
/// Returns `None` only when nothing can be resolved at all.
pub fn find_next_holiday(catalog: &HolidayCatalog, today: NaiveDate) -> Option<NextHoliday<'_>> {
    let year = today.year();

    let this_year = catalog.all_holidays().iter().find_map(|record| {
        record
            .date_in(year)
            .filter(|date| *date > today)
            .map(|date| NextHoliday {
                record,
                date,
                wrapped: false,
            })
    });
    if this_year.is_some() {
        return this_year;
    }

    catalog.all_holidays().iter().find_map(|record| {
        record.date_in(year + 1).map(|date| NextHoliday {
            record,
            date,
            wrapped: true,
        })
    })
}

/// Holidays strictly later in the year than `today`, in catalog order.
///
/// Months are one-indexed on both sides of the comparison: a holiday
/// remains when its month is after today's, or it falls later in today's
/// month.
pub fn remaining_holidays(catalog: &HolidayCatalog, today: NaiveDate) -> RemainingHolidays {
    let (month, day) = (today.month(), today.day());
    let names: Vec<String> = catalog
        .all_holidays()
        .iter()
        .filter(|h| h.month > month || (h.month == month && h.day > day))
        .map(|h| h.name.clone())
        .collect();
    let count = names.len();
    RemainingHolidays { names, count }
}

/// Case-insensitive exact lookup by name. First match in catalog order wins.
pub fn lookup_holiday<'a>(catalog: &'a HolidayCatalog, name: &str) -> Option<&'a HolidayRecord> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    catalog
        .all_holidays()
        .iter()
        .find(|h| h.name.to_lowercase() == wanted)
}

/// Every holiday name in catalog order.
pub fn all_holiday_names(catalog: &HolidayCatalog) -> Vec<&str> {
    catalog
        .all_holidays()
        .iter()
        .map(|h| h.name.as_str())
        .collect()
}
