//! Daily news feed and the per-day news journal.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::NewsFeedConfig;
use crate::models::news::{NewsArticle, NewsJournalEntry, NewsLanguage};

const FALLBACK_ZH: [(&str, &str); 2] = [
    (
        "国家推进新能源基础设施建设，释放绿色发展动能",
        "https://news.example.com/cn/green-energy",
    ),
    (
        "上海自贸区发布新政策，吸引外资企业入驻",
        "https://news.example.com/cn/shanghai-free-trade",
    ),
];

const FALLBACK_EN: [(&str, &str); 2] = [
    (
        "Global markets rally as inflation shows signs of cooling",
        "https://news.example.com/en/markets-rally",
    ),
    (
        "Breakthrough in renewable storage promises cheaper green energy",
        "https://news.example.com/en/renewable-storage",
    ),
];

/// Article as the upstream feeds send it. Field names vary by provider.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalArticle {
    pub title: Option<String>,
    pub link: Option<String>,
    pub url: Option<String>,
    pub source: Option<ExternalSource>,
    pub published_at: Option<String>,
    pub pub_date: Option<String>,
    pub id: Option<String>,
    pub guid: Option<String>,
    pub origin: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ExternalSource {
    Name(String),
    Object { name: Option<String> },
}

#[derive(Debug, Default, Deserialize)]
struct FeedResponse {
    articles: Option<Vec<ExternalArticle>>,
    data: Option<Vec<ExternalArticle>>,
}

/// First 16 hex chars of SHA-256.
pub fn short_hash(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(16);
    hex
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Articles without a title are dropped; every other gap gets a stable default.
pub fn normalize_articles(articles: Vec<ExternalArticle>, language: NewsLanguage) -> Vec<NewsArticle> {
    let lang = language.as_str();
    articles
        .into_iter()
        .filter_map(|item| {
            let title = non_empty(item.title.as_deref())?.to_string();
            let url = match non_empty(item.url.as_deref().or(item.link.as_deref())) {
                Some(url) => url.to_string(),
                None => format!(
                    "https://news.local/{lang}/{}",
                    short_hash(&format!("{title}{}", item.guid.as_deref().unwrap_or_default()))
                ),
            };
            let source = match &item.source {
                Some(ExternalSource::Name(name)) => Some(name.as_str()),
                Some(ExternalSource::Object { name }) => name.as_deref().or(item.origin.as_deref()),
                None => item.origin.as_deref(),
            };
            let source = non_empty(source)
                .unwrap_or(language.default_source())
                .to_string();
            let id_base = item.id.as_deref().or(item.guid.as_deref()).unwrap_or(&url);

            Some(NewsArticle {
                id: short_hash(&format!("{lang}-{id_base}")),
                title,
                url,
                source,
                language,
                published_at: item.published_at.or(item.pub_date),
            })
        })
        .collect()
}

pub fn fallback_articles(language: NewsLanguage, now: DateTime<Utc>) -> Vec<NewsArticle> {
    let (pool, source) = match language {
        NewsLanguage::Zh => (FALLBACK_ZH, "澎湃新闻"),
        NewsLanguage::En => (FALLBACK_EN, "Sample Daily"),
    };
    pool.iter()
        .map(|(title, url)| NewsArticle {
            id: short_hash(&format!("{}-{title}", language.as_str())),
            title: title.to_string(),
            url: url.to_string(),
            source: source.to_string(),
            language,
            published_at: Some(now.to_rfc3339()),
        })
        .collect()
}

async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    api_key: Option<&str>,
    language: NewsLanguage,
) -> Result<Vec<NewsArticle>, anyhow::Error> {
    let mut request = client.get(url);
    if let Some(key) = api_key {
        request = request.header("Authorization", key).header("X-Api-Key", key);
    }
    let response = request.send().await?;

    if !response.status().is_success() {
        anyhow::bail!("News feed {} returned {}", url, response.status());
    }

    let body: FeedResponse = response.json().await?;
    let articles = body.articles.or(body.data).unwrap_or_default();
    Ok(normalize_articles(articles, language))
}

async fn source_articles(
    client: &reqwest::Client,
    feed: &NewsFeedConfig,
    language: NewsLanguage,
) -> Vec<NewsArticle> {
    let Some(url) = feed.url.as_deref() else {
        return fallback_articles(language, Utc::now());
    };
    match fetch_feed(client, url, feed.api_key.as_deref(), language).await {
        Ok(articles) => articles,
        Err(e) => {
            tracing::warn!(error = %e, language = language.as_str(), "News feed unavailable, using fallback");
            fallback_articles(language, Utc::now())
        }
    }
}

/// Both feeds fetched together; Chinese first, then English, duplicates removed.
pub async fn fetch_daily_news(
    client: &reqwest::Client,
    zh: &NewsFeedConfig,
    en: &NewsFeedConfig,
) -> Vec<NewsArticle> {
    let (zh_articles, en_articles) = tokio::join!(
        source_articles(client, zh, NewsLanguage::Zh),
        source_articles(client, en, NewsLanguage::En),
    );
    dedupe(zh_articles.into_iter().chain(en_articles))
}

fn dedupe(articles: impl IntoIterator<Item = NewsArticle>) -> Vec<NewsArticle> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|a| seen.insert(a.id.clone()))
        .collect()
}

/// Put `entry` first and drop any older entry for the same article.
pub fn merge_entry(existing: &[NewsJournalEntry], entry: NewsJournalEntry) -> Vec<NewsJournalEntry> {
    let mut entries = Vec::with_capacity(existing.len() + 1);
    entries.extend(
        existing
            .iter()
            .filter(|e| e.article.id != entry.article.id)
            .cloned(),
    );
    entries.insert(0, entry);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn external(json: serde_json::Value) -> ExternalArticle {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_short_hash() {
        let h = short_hash("zh-abc");
        assert_eq!(h.len(), 16);
        assert_eq!(h, short_hash("zh-abc"));
        assert_ne!(h, short_hash("en-abc"));
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let articles = normalize_articles(
            vec![
                external(serde_json::json!({ "title": "  Rates hold ", "link": "https://x.test/a", "source": { "name": "Wire" }, "pubDate": "Mon" })),
                external(serde_json::json!({ "title": "No link", "source": "  " })),
                external(serde_json::json!({ "title": "   " })),
            ],
            NewsLanguage::Zh,
        );
        assert_eq!(articles.len(), 2);

        assert_eq!(articles[0].title, "Rates hold");
        assert_eq!(articles[0].url, "https://x.test/a");
        assert_eq!(articles[0].source, "Wire");
        assert_eq!(articles[0].published_at.as_deref(), Some("Mon"));
        assert_eq!(articles[0].id, short_hash("zh-https://x.test/a"));

        assert!(articles[1].url.starts_with("https://news.local/zh/"));
        assert_eq!(articles[1].source, "澎湃新闻");
    }

    #[test]
    fn test_id_prefers_upstream_id() {
        let articles = normalize_articles(
            vec![external(serde_json::json!({ "title": "t", "url": "https://x.test", "guid": "g-1" }))],
            NewsLanguage::En,
        );
        assert_eq!(articles[0].id, short_hash("en-g-1"));
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let now = Utc::now();
        let mut pool = fallback_articles(NewsLanguage::En, now);
        pool.extend(fallback_articles(NewsLanguage::En, now));
        assert_eq!(dedupe(pool).len(), 2);
    }

    #[tokio::test]
    async fn test_missing_endpoint_uses_fallback() {
        let client = reqwest::Client::new();
        let feed = NewsFeedConfig::default();
        let articles = fetch_daily_news(&client, &feed, &feed).await;
        assert_eq!(articles.len(), 4);
        assert_eq!(articles[0].language, NewsLanguage::Zh);
        assert_eq!(articles[3].language, NewsLanguage::En);
    }

    #[test]
    fn test_merge_entry_replaces_and_moves_to_front() {
        let now = Utc::now();
        let articles = fallback_articles(NewsLanguage::En, now);
        let entry = |article: &NewsArticle, rating| NewsJournalEntry {
            article: article.clone(),
            rating,
            comment: String::new(),
            recorded_at: now,
        };

        let entries = merge_entry(&[], entry(&articles[0], 2));
        let entries = merge_entry(&entries, entry(&articles[1], 4));
        let entries = merge_entry(&entries, entry(&articles[0], 5));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].article.id, articles[0].id);
        assert_eq!(entries[0].rating, 5);
        assert_eq!(entries[1].article.id, articles[1].id);
    }
}
