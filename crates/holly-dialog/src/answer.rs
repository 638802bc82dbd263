//! Answer selection.
//!
//! Turns a classified utterance into a structured [`Answer`] using the
//! query engine. Wording lives in [`crate::response`]; nothing here builds
//! user-facing text. `None` means the utterance could not be answered and
//! the caller should fall back.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use holly_core::{
    all_holiday_names, find_next_holiday, lookup_holiday, remaining_holidays, weekday_name_of,
    HolidayCatalog,
};

use crate::types::{Intent, IntentResult, ENTITY_COUNT, ENTITY_HOLIDAY, ENTITY_REMAIN, ENTITY_WHEN};

/// Which part of a holiday's date a `when` entity asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhenField {
    /// `date` or `when`: the full `MM-DD`.
    Date,
    Month,
    Day,
}

impl WhenField {
    /// Parse a `when` entity value. Case-insensitive, surrounding whitespace
    /// ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "date" | "when" => Some(WhenField::Date),
            "month" => Some(WhenField::Month),
            "day" => Some(WhenField::Day),
            _ => None,
        }
    }
}

/// The date detail a `whenHoliday` answer carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum HolidayDetail {
    Date(String),
    Month(u32),
    Day(u32),
}

/// A structured answer to one holiday question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Answer {
    AllHolidays {
        names: Vec<String>,
    },
    RemainingCount {
        count: usize,
    },
    RemainingNames {
        names: Vec<String>,
    },
    NextHoliday {
        name: String,
        weekday: &'static str,
        /// `MM-DD` of the resolved date.
        date: String,
        wrapped: bool,
    },
    WhenHoliday {
        name: String,
        detail: HolidayDetail,
    },
}

/// Select the answer for a holiday-query intent.
///
/// Non-query intents, incomplete entities, and unknown holidays all return
/// `None`.
pub fn select(result: &IntentResult, catalog: &HolidayCatalog, today: NaiveDate) -> Option<Answer> {
    match result.intent {
        Intent::AllHolidays => Some(Answer::AllHolidays {
            names: all_holiday_names(catalog)
                .into_iter()
                .map(String::from)
                .collect(),
        }),
        Intent::RemainingHolidays => select_remaining(result, catalog, today),
        Intent::NextHoliday => {
            let next = find_next_holiday(catalog, today)?;
            Some(Answer::NextHoliday {
                name: next.record.name.clone(),
                weekday: weekday_name_of(next.date),
                date: next.date.format("%m-%d").to_string(),
                wrapped: next.wrapped,
            })
        }
        Intent::WhenHoliday => select_when(result, catalog),
        Intent::Wake | Intent::Goodbye | Intent::None => None,
    }
}

/// `count` wins over `remain`; neither means the question is incomplete.
fn select_remaining(
    result: &IntentResult,
    catalog: &HolidayCatalog,
    today: NaiveDate,
) -> Option<Answer> {
    let remaining = remaining_holidays(catalog, today);
    if result.find_entity(ENTITY_COUNT).is_some() {
        Some(Answer::RemainingCount {
            count: remaining.count,
        })
    } else if result.find_entity(ENTITY_REMAIN).is_some() {
        Some(Answer::RemainingNames {
            names: remaining.names,
        })
    } else {
        debug!(query = %result.query, "remainingHolidays without count or remain entity");
        None
    }
}

fn select_when(result: &IntentResult, catalog: &HolidayCatalog) -> Option<Answer> {
    let when = result.find_entity(ENTITY_WHEN)?;
    let holiday = result.find_entity(ENTITY_HOLIDAY)?;

    let Some(field) = WhenField::parse(&when.value) else {
        debug!(value = %when.value, "Unsupported when entity");
        return None;
    };
    let Some(record) = lookup_holiday(catalog, &holiday.value) else {
        debug!(holiday = %holiday.value, "Holiday not in catalog");
        return None;
    };

    let detail = match field {
        WhenField::Date => HolidayDetail::Date(record.date.clone()),
        WhenField::Month => HolidayDetail::Month(record.month),
        WhenField::Day => HolidayDetail::Day(record.day),
    };
    Some(Answer::WhenHoliday {
        name: record.name.clone(),
        detail,
    })
}
