use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::calendar::DateKey;
use crate::error::{AppError, AppResult};
use crate::handlers::key_or_today;
use crate::models::daily_log::{DailyLogFields, DailyLogQuery};
use crate::models::news::{NewsArticle, NewsJournalResponse, SaveNewsEntryRequest};
use crate::services::news::{fetch_daily_news, merge_entry};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub logical_date: DateKey,
    pub articles: Vec<NewsArticle>,
}

pub async fn get_news(State(state): State<AppState>) -> Json<NewsResponse> {
    let articles =
        fetch_daily_news(&state.http, &state.config.news_zh, &state.config.news_en).await;

    Json(NewsResponse {
        logical_date: state.clock.today_key(),
        articles,
    })
}

pub async fn get_news_journal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DailyLogQuery>,
) -> AppResult<Json<NewsJournalResponse>> {
    let key = key_or_today(&state, query.date.as_deref())?;
    let entries = state
        .journal
        .find_by_key(auth_user.id, &key)
        .await?
        .map(|log| log.news_entries)
        .unwrap_or_default();

    Ok(Json(NewsJournalResponse {
        logical_date: key,
        entries,
    }))
}

/// Rate or re-rate an article on a day. Saving on an empty day creates a
/// neutral record to hold the entry.
pub async fn save_news_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<SaveNewsEntryRequest>,
) -> AppResult<Json<NewsJournalResponse>> {
    body.validate()?;
    let key = key_or_today(&state, body.logical_date.as_deref())?;

    // Never overwrites a form saved for the day in the meantime.
    let log = state
        .journal
        .insert_if_absent(auth_user.id, &key, &DailyLogFields::placeholder())
        .await?;

    let entries = merge_entry(&log.news_entries, body.entry(Utc::now()));
    let saved = state
        .journal
        .replace_news_entries(auth_user.id, &key, &entries)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No daily log for {key}")))?;

    tracing::info!(
        user_id = %auth_user.id,
        logical_date = %key,
        article_id = %body.article_id,
        "News entry saved"
    );

    Ok(Json(NewsJournalResponse {
        logical_date: key,
        entries: saved.news_entries,
    }))
}
