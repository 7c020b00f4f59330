use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::calendar::DateKey;
use crate::error::{AppError, AppResult};
use crate::models::category::Palette;
use crate::models::news::NewsJournalEntry;

pub const MAX_DETAIL_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentalWorldEntry {
    pub value: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub logical_date: DateKey,
    pub mood: i32,
    pub sleep_quality: i32,
    pub energy_level: i32,
    pub primary_activities: Vec<String>,
    pub mental_world_activities: Vec<MentalWorldEntry>,
    pub daily_life_activities: Vec<String>,
    pub notes: Option<String>,
    pub news_entries: Vec<NewsJournalEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything a save replaces. News entries are not part of it; they are
/// maintained by the news journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyLogFields {
    pub mood: i32,
    pub sleep_quality: i32,
    pub energy_level: i32,
    pub primary_activities: Vec<String>,
    pub mental_world_activities: Vec<MentalWorldEntry>,
    pub daily_life_activities: Vec<String>,
    pub notes: Option<String>,
}

impl DailyLogFields {
    /// Neutral record created when a news entry is saved on an empty day.
    pub fn placeholder() -> Self {
        Self {
            mood: 3,
            sleep_quality: 3,
            energy_level: 3,
            primary_activities: Vec::new(),
            mental_world_activities: Vec::new(),
            daily_life_activities: Vec::new(),
            notes: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertDailyLogRequest {
    /// Defaults to today's logical date.
    pub logical_date: Option<String>,

    #[validate(range(min = 1, max = 5, message = "Mood must be between 1 and 5"))]
    pub mood: i32,

    #[validate(range(min = 1, max = 5, message = "Sleep quality must be between 1 and 5"))]
    pub sleep_quality: i32,

    #[validate(range(min = 1, max = 5, message = "Energy level must be between 1 and 5"))]
    pub energy_level: i32,

    #[serde(default)]
    pub primary_activities: Vec<String>,

    #[serde(default)]
    pub mental_world_activities: Vec<MentalWorldEntry>,

    #[serde(default)]
    pub daily_life_activities: Vec<String>,

    #[validate(length(max = 1000, message = "Notes must be under 1000 characters"))]
    pub notes: Option<String>,
}

impl UpsertDailyLogRequest {
    /// Check every tag against its palette and normalize the payload.
    ///
    /// Unknown tags are rejected here so they never reach storage.
    pub fn into_fields(self) -> AppResult<(Option<DateKey>, DailyLogFields)> {
        self.validate()?;

        let key = match self.logical_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(DateKey::parse(raw)?),
        };

        let primary_activities = checked_tags(Palette::PrimaryActivity, self.primary_activities)?;
        let daily_life_activities = checked_tags(Palette::DailyLife, self.daily_life_activities)?;

        let mut mental_world_activities: Vec<MentalWorldEntry> = Vec::new();
        for entry in self.mental_world_activities {
            ensure_known(Palette::MentalWorld, &entry.value)?;
            let detail = entry.detail.trim().to_string();
            let chars = detail.chars().count();
            if chars == 0 || chars > MAX_DETAIL_CHARS {
                return Err(AppError::Validation(format!(
                    "Detail for {} must be 1-{MAX_DETAIL_CHARS} characters",
                    entry.value
                )));
            }
            let entry = MentalWorldEntry {
                value: entry.value,
                detail,
            };
            if !mental_world_activities.contains(&entry) {
                mental_world_activities.push(entry);
            }
        }

        let notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok((
            key,
            DailyLogFields {
                mood: self.mood,
                sleep_quality: self.sleep_quality,
                energy_level: self.energy_level,
                primary_activities,
                mental_world_activities,
                daily_life_activities,
                notes,
            },
        ))
    }
}

fn ensure_known(palette: Palette, value: &str) -> AppResult<()> {
    if palette.contains(value) {
        Ok(())
    } else {
        Err(AppError::UnknownCategory {
            palette: palette.as_str(),
            value: value.to_string(),
        })
    }
}

/// Tags form a set: unknown values fail, repeats collapse, first-seen order is kept.
fn checked_tags(palette: Palette, tags: Vec<String>) -> AppResult<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        ensure_known(palette, &tag)?;
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
pub struct DailyLogQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DailyLogResponse {
    pub logical_date: DateKey,
    pub log: Option<DailyLog>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub month: String,
    pub start: DateKey,
    pub end: DateKey,
    pub dates: Vec<DateKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> UpsertDailyLogRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_valid_request_normalizes() {
        let (key, fields) = request(serde_json::json!({
            "logical_date": "2024-06-01",
            "mood": 4, "sleep_quality": 2, "energy_level": 5,
            "primary_activities": ["WORK", "WORK", "REST"],
            "mental_world_activities": [{ "value": "BOOK", "detail": "  Dune " }],
            "daily_life_activities": ["WALK"],
            "notes": "   "
        }))
        .into_fields()
        .unwrap();

        assert_eq!(key.unwrap().as_str(), "2024-06-01");
        assert_eq!(fields.primary_activities, vec!["WORK", "REST"]);
        assert_eq!(fields.mental_world_activities[0].detail, "Dune");
        assert_eq!(fields.notes, None);
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = request(serde_json::json!({
            "mood": 3, "sleep_quality": 3, "energy_level": 3,
            "daily_life_activities": ["SKYDIVING"]
        }))
        .into_fields()
        .unwrap_err();
        assert!(matches!(err, AppError::UnknownCategory { palette: "daily_life", .. }));
    }

    #[test]
    fn test_tag_from_other_palette_is_rejected() {
        let err = request(serde_json::json!({
            "mood": 3, "sleep_quality": 3, "energy_level": 3,
            "primary_activities": ["BOOK"]
        }))
        .into_fields()
        .unwrap_err();
        assert!(matches!(err, AppError::UnknownCategory { .. }));
    }

    #[test]
    fn test_scores_out_of_range() {
        let err = request(serde_json::json!({
            "mood": 6, "sleep_quality": 3, "energy_level": 3
        }))
        .into_fields()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_malformed_date() {
        let err = request(serde_json::json!({
            "logical_date": "2024-6-1",
            "mood": 3, "sleep_quality": 3, "energy_level": 3
        }))
        .into_fields()
        .unwrap_err();
        assert!(matches!(err, AppError::MalformedKey(_)));
    }

    #[test]
    fn test_empty_detail_rejected() {
        let err = request(serde_json::json!({
            "mood": 3, "sleep_quality": 3, "energy_level": 3,
            "mental_world_activities": [{ "value": "MOVIE", "detail": " " }]
        }))
        .into_fields()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
