//! Logical-day arithmetic.
//!
//! A journal day starts at [`DEFAULT_BOUNDARY_HOUR`] rather than midnight. Raw
//! instants become [`LogicalDate`]s exactly once, through
//! [`LogicalDate::from_instant`]; from then on a day is identified by its
//! canonical [`DateKey`]. Month ranges are half-open windows of keys.

pub mod date_key;
pub mod logical_date;
pub mod month;

pub use date_key::{DateKey, DateKeyError};
pub use logical_date::{JournalClock, LogicalDate, DEFAULT_BOUNDARY_HOUR};
pub use month::MonthWindow;
