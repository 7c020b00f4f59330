use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::Serialize;

use super::date_key::DateKey;

/// Hour at which a new journal day starts.
pub const DEFAULT_BOUNDARY_HOUR: u32 = 4;

/// Keys carry four-digit years, so logical dates stay within years 0000-9999.
pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 9999;

fn within_key_range(date: NaiveDate) -> NaiveDate {
    match date.year() {
        y if y < MIN_YEAR => NaiveDate::from_ymd_opt(MIN_YEAR, 1, 1).unwrap_or(date),
        y if y > MAX_YEAR => NaiveDate::from_ymd_opt(MAX_YEAR, 12, 31).unwrap_or(date),
        _ => date,
    }
}

/// The day an entry belongs to. Only ever derived from a raw instant through
/// [`LogicalDate::from_instant`] or decoded from an already-canonical [`DateKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LogicalDate(NaiveDate);

impl LogicalDate {
    /// Apply the day-boundary rule to a wall-clock instant.
    ///
    /// Instants before `boundary_hour` belong to the previous calendar day. The
    /// boundary hour itself already belongs to the new day.
    pub fn from_instant<T: TimeZone>(instant: &DateTime<T>, boundary_hour: u32) -> Self {
        let local = instant.naive_local();
        let date = local.date();
        if local.hour() < boundary_hour {
            Self::from_calendar_date(date.checked_sub_days(Days::new(1)).unwrap_or(date))
        } else {
            Self::from_calendar_date(date)
        }
    }

    /// Wrap a calendar date that is already a logical date (e.g. decoded from a key).
    pub(crate) fn from_calendar_date(date: NaiveDate) -> Self {
        Self(within_key_range(date))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn key(&self) -> DateKey {
        DateKey::from(*self)
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Saturates at 9999-12-31.
    pub fn add_days(self, days: u64) -> Self {
        Self::from_calendar_date(self.0.checked_add_days(Days::new(days)).unwrap_or(self.0))
    }

    /// Saturates at 0000-01-01.
    pub fn sub_days(self, days: u64) -> Self {
        Self::from_calendar_date(self.0.checked_sub_days(Days::new(days)).unwrap_or(self.0))
    }

    /// Sunday on or before this date.
    pub fn week_start(self) -> Self {
        self.sub_days(u64::from(self.weekday().num_days_from_sunday()))
    }

    /// Saturday on or after this date. In the last week of 9999 this is
    /// 9999-12-31, a Friday.
    pub fn week_end(self) -> Self {
        self.add_days(u64::from(6 - self.weekday().num_days_from_sunday()))
    }
}

/// Deployment-wide reference for "now": the journal timezone and day boundary.
#[derive(Debug, Clone, Copy)]
pub struct JournalClock {
    pub timezone: Tz,
    pub boundary_hour: u32,
}

impl JournalClock {
    pub fn new(timezone: Tz, boundary_hour: u32) -> Self {
        Self {
            timezone,
            boundary_hour,
        }
    }

    pub fn logical_date_at(&self, instant: DateTime<Utc>) -> LogicalDate {
        LogicalDate::from_instant(&instant.with_timezone(&self.timezone), self.boundary_hour)
    }

    pub fn today(&self) -> LogicalDate {
        self.logical_date_at(Utc::now())
    }

    pub fn today_key(&self) -> DateKey {
        self.today().key()
    }
}

impl Default for JournalClock {
    fn default() -> Self {
        Self::new(Tz::UTC, DEFAULT_BOUNDARY_HOUR)
    }
}
