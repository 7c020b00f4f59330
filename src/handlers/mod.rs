pub mod auth;
pub mod categories;
pub mod daily_logs;
pub mod dashboard;
pub mod demo;
pub mod health;
pub mod news;

use crate::calendar::DateKey;
use crate::error::AppResult;
use crate::AppState;

/// `?date=` as a key, or today's logical date when it is absent or blank.
pub(crate) fn key_or_today(state: &AppState, raw: Option<&str>) -> AppResult<DateKey> {
    match raw.map(str::trim) {
        None | Some("") => Ok(state.clock.today_key()),
        Some(raw) => Ok(DateKey::parse(raw)?),
    }
}

/// Comma separated category values; blanks are ignored.
pub(crate) fn split_filter(raw: Option<&str>) -> Vec<String> {
    raw.map(|r| {
        r.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_filter() {
        assert_eq!(split_filter(Some("WALK, SHOWER,,")), vec!["WALK", "SHOWER"]);
        assert!(split_filter(Some(" ")).is_empty());
        assert!(split_filter(None).is_empty());
    }
}
