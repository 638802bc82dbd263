//! Core of the Holly holiday bot: configuration, errors, the holiday
//! catalog, date utilities, and the holiday query engine.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod query;
pub mod types;

pub use catalog::HolidayCatalog;
pub use clock::{weekday_name, weekday_name_of, Clock, FixedClock, SystemClock};
pub use config::HollyConfig;
pub use error::{HollyError, Result};
pub use query::{
    all_holiday_names, find_next_holiday, lookup_holiday, remaining_holidays, NextHoliday,
    RemainingHolidays,
};
pub use types::HolidayRecord;
