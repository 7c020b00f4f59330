use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::logical_date::{LogicalDate, MAX_YEAR, MIN_YEAR};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateKeyError {
    #[error("malformed date key: {0:?}")]
    MalformedKey(String),
}

/// Canonical `YYYY-MM-DD` identity of a logical date.
///
/// Keys are always zero padded, so ordering the strings orders the days. All
/// range queries compare keys, never date objects.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey {
    key: String,
    date: NaiveDate,
}

impl DateKey {
    pub fn parse(raw: &str) -> Result<Self, DateKeyError> {
        let malformed = || DateKeyError::MalformedKey(raw.to_string());

        if !has_shape(raw, &[4, 2, 2]) {
            return Err(malformed());
        }
        let year: i32 = raw[0..4].parse().map_err(|_| malformed())?;
        let month: u32 = raw[5..7].parse().map_err(|_| malformed())?;
        let day: u32 = raw[8..10].parse().map_err(|_| malformed())?;

        // Day-of-month is checked against the real month length.
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(malformed)?;
        Ok(Self {
            key: raw.to_string(),
            date,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Decode the date this key names. The day boundary is not applied again.
    pub fn logical_date(&self) -> LogicalDate {
        LogicalDate::from_calendar_date(self.date)
    }

    /// The `YYYY-MM` prefix.
    pub fn month_prefix(&self) -> &str {
        &self.key[..7]
    }

    /// First day of a month. `None` when the month is outside 1-12 or the year
    /// has no four-digit key.
    pub(crate) fn first_of_month(year: i32, month: u32) -> Option<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|date| Self::from(LogicalDate::from_calendar_date(date)))
    }
}

impl From<LogicalDate> for DateKey {
    fn from(date: LogicalDate) -> Self {
        let d = date.date();
        Self {
            key: format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()),
            date: d,
        }
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.key
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// True when `raw` is ASCII digit groups of the given widths joined by `-`.
pub(crate) fn has_shape(raw: &str, widths: &[usize]) -> bool {
    let expected_len = widths.iter().sum::<usize>() + widths.len() - 1;
    if raw.len() != expected_len {
        return false;
    }
    let mut groups = raw.split('-');
    let ok = widths.iter().all(|&w| {
        groups
            .next()
            .is_some_and(|g| g.len() == w && g.bytes().all(|b| b.is_ascii_digit()))
    });
    ok && groups.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> LogicalDate {
        LogicalDate::from_calendar_date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_keys_are_zero_padded() {
        assert_eq!(DateKey::from(date(2024, 1, 5)).as_str(), "2024-01-05");
        assert_eq!(DateKey::from(date(987, 12, 31)).as_str(), "0987-12-31");
    }

    #[test]
    fn test_key_decodes_to_same_date() {
        let mut d = date(2023, 12, 25);
        for _ in 0..500 {
            assert_eq!(DateKey::from(d).logical_date(), d);
            d = d.add_days(1);
        }
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for raw in [
            "",
            "2024-1-05",
            "2024-01-5",
            "24-01-05",
            "2024/01/05",
            "2024-01-05T00:00",
            " 2024-01-05",
            "2024-0a-05",
            "+202-01-05",
        ] {
            assert_eq!(
                DateKey::parse(raw),
                Err(DateKeyError::MalformedKey(raw.to_string())),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert!(DateKey::parse("2024-13-01").is_err());
        assert!(DateKey::parse("2024-00-10").is_err());
        assert!(DateKey::parse("2024-02-30").is_err());
        assert!(DateKey::parse("2023-02-29").is_err());
        assert!(DateKey::parse("2024-04-31").is_err());
        assert!(DateKey::parse("2024-02-29").is_ok());
    }

    #[test]
    fn test_ordering_matches_chronology() {
        let mut keys = vec![
            DateKey::parse("2024-10-01").unwrap(),
            DateKey::parse("2024-02-15").unwrap(),
            DateKey::parse("2023-12-31").unwrap(),
            DateKey::parse("2024-02-09").unwrap(),
        ];
        keys.sort();
        let ordered: Vec<&str> = keys.iter().map(DateKey::as_str).collect();
        assert_eq!(ordered, ["2023-12-31", "2024-02-09", "2024-02-15", "2024-10-01"]);
    }

    #[test]
    fn test_serde_validates() {
        let key: DateKey = serde_json::from_str("\"2024-06-01\"").unwrap();
        assert_eq!(key.as_str(), "2024-06-01");
        assert!(serde_json::from_str::<DateKey>("\"2024-6-1\"").is_err());
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-06-01\"");
    }

    #[test]
    fn test_keys_never_leave_four_digit_years() {
        let last = DateKey::parse("9999-12-31").unwrap();
        let next = last.logical_date().add_days(1).key();
        assert_eq!(next, last);
        assert_eq!(DateKey::parse(next.as_str()).unwrap(), next);

        let first = DateKey::parse("0000-01-01").unwrap();
        assert_eq!(first.logical_date().sub_days(1).key(), first);
        assert!(DateKey::first_of_month(10000, 1).is_none());
    }

    #[test]
    fn test_shape_check() {
        assert!(has_shape("2024-06", &[4, 2]));
        assert!(!has_shape("2024-6", &[4, 2]));
        assert!(!has_shape("2024-06-01", &[4, 2]));
    }
}
