use serde::Serialize;

use super::date_key::{has_shape, DateKey};

/// Half-open `[start, end)` range of date keys covering one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    /// `YYYY-MM`
    pub month: String,
    pub start: DateKey,
    pub end: DateKey,
}

impl MonthWindow {
    /// Window for an explicit `YYYY-MM` month. `None` when the text is not a month.
    pub fn for_month(raw: &str) -> Option<Self> {
        if !has_shape(raw, &[4, 2]) {
            return None;
        }
        let year: i32 = raw[0..4].parse().ok()?;
        let month: u32 = raw[5..7].parse().ok()?;

        let start = DateKey::first_of_month(year, month)?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = DateKey::first_of_month(next_year, next_month)?;

        Some(Self {
            month: raw.to_string(),
            start,
            end,
        })
    }

    /// The month named by `requested`, or the month containing `today` when the
    /// parameter is absent or unusable. A calendar control never errors here.
    pub fn resolve(requested: Option<&str>, today: &DateKey) -> Self {
        if let Some(window) = requested.map(str::trim).and_then(Self::for_month) {
            return window;
        }
        if let Some(raw) = requested {
            tracing::debug!(month = %raw, "Ignoring invalid month parameter");
        }
        Self::containing(today)
    }

    pub fn containing(key: &DateKey) -> Self {
        // Only 9999-12 has no end key; degrade to an empty window.
        Self::for_month(key.month_prefix()).unwrap_or_else(|| Self {
            month: key.month_prefix().to_string(),
            start: key.clone(),
            end: key.clone(),
        })
    }

    pub fn contains(&self, key: &DateKey) -> bool {
        key.as_str() >= self.start.as_str() && key.as_str() < self.end.as_str()
    }

    /// Every key in the window, ascending.
    pub fn keys(&self) -> Vec<DateKey> {
        let mut keys = Vec::with_capacity(31);
        let mut day = self.start.logical_date();
        while keys.len() < 31 {
            let key = day.key();
            if !self.contains(&key) {
                break;
            }
            keys.push(key);
            day = day.add_days(1);
        }
        keys
    }
}
