use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsLanguage {
    Zh,
    En,
}

impl NewsLanguage {
    pub fn as_str(self) -> &'static str {
        match self {
            NewsLanguage::Zh => "zh",
            NewsLanguage::En => "en",
        }
    }

    pub fn default_source(self) -> &'static str {
        match self {
            NewsLanguage::Zh => "澎湃新闻",
            NewsLanguage::En => "Unknown Source",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub language: NewsLanguage,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub published_at: Option<String>,
}

/// A user's reaction to an article, stored on the day's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsJournalEntry {
    #[serde(flatten)]
    pub article: NewsArticle,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveNewsEntryRequest {
    /// Defaults to today's logical date.
    pub logical_date: Option<String>,

    #[validate(length(min = 1, message = "Article id is required"))]
    pub article_id: String,

    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(url(message = "Invalid article URL"))]
    pub url: String,

    #[validate(length(min = 1, message = "Source is required"))]
    pub source: String,

    pub language: NewsLanguage,

    pub published_at: Option<String>,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(max = 2000, message = "Comment must be under 2000 characters"))]
    pub comment: Option<String>,
}

impl SaveNewsEntryRequest {
    pub fn entry(&self, recorded_at: DateTime<Utc>) -> NewsJournalEntry {
        NewsJournalEntry {
            article: NewsArticle {
                id: self.article_id.clone(),
                title: self.title.clone(),
                url: self.url.clone(),
                source: self.source.clone(),
                language: self.language,
                published_at: self.published_at.clone(),
            },
            rating: self.rating,
            comment: self.comment.clone().unwrap_or_default(),
            recorded_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NewsJournalResponse {
    pub logical_date: crate::calendar::DateKey,
    pub entries: Vec<NewsJournalEntry>,
}
