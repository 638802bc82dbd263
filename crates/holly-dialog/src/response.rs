//! Reply wording.
//!
//! Every user-facing string the bot sends is produced here.

use crate::answer::{Answer, HolidayDetail};

const HELP_TEXT: &str = "These are some things I can help you with.  You can say:\n\n\
Next holiday\n\nList of all holidays\n\nRemaining holidays\n\nWhen is Labor Day?";

const FALLBACK_TEXT: &str = "Sorry, I didn't understand.";

const FAREWELL_TEXT: &str = "Ok... See you later.";

/// Renders answers and fixed replies into message text.
#[derive(Debug, Clone)]
pub struct ResponseRenderer {
    bot_name: String,
    calendar_label: String,
}

impl ResponseRenderer {
    pub fn new(bot_name: impl Into<String>, calendar_label: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            calendar_label: calendar_label.into(),
        }
    }

    /// Sent when the wake phrase is heard.
    pub fn greeting(&self) -> String {
        format!("Hi! I'm {} the Holiday Bot.", self.bot_name)
    }

    pub fn help(&self) -> String {
        HELP_TEXT.to_string()
    }

    pub fn fallback(&self) -> String {
        FALLBACK_TEXT.to_string()
    }

    /// Reply to anything other than the wake phrase before a conversation
    /// has started.
    pub fn not_understood(&self, query: &str) -> String {
        format!("Sorry, I did not understand '{}'.", query.trim())
    }

    pub fn farewell(&self) -> String {
        FAREWELL_TEXT.to_string()
    }

    pub fn render(&self, answer: &Answer) -> String {
        match answer {
            Answer::AllHolidays { names } => format!(
                "These are ALL {} Holidays: {}.",
                self.calendar_label,
                names.join(", ")
            ),
            Answer::RemainingCount { count } => {
                format!("The number of Holidays left is {}.", count)
            }
            Answer::RemainingNames { names } if names.is_empty() => {
                "There are no Holidays left this year.".to_string()
            }
            Answer::RemainingNames { names } => {
                format!("The remaining Holidays are:\n\n{}", names.join("\n\n"))
            }
            Answer::NextHoliday {
                name,
                weekday,
                date,
                ..
            } => format!("{} is on {}, {}", name, weekday, date),
            Answer::WhenHoliday { name, detail } => match detail {
                HolidayDetail::Date(date) => format!("{} is on {}.", name, date),
                HolidayDetail::Month(month) => format!("{} is in month {}.", name, month),
                HolidayDetail::Day(day) => format!("{} is on day {} of its month.", name, day),
            },
        }
    }
}

impl Default for ResponseRenderer {
    fn default() -> Self {
        Self::new("Holly", "US")
    }
}
