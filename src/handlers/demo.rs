use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::dashboard::{build_dashboard, Dashboard};
use crate::handlers::key_or_today;
use crate::models::category::Locale;
use crate::models::news::NewsJournalEntry;
use crate::services::demo::{demo_news_entries, generate_month, DemoMonth};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DemoQuery {
    pub date: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DemoResponse {
    pub is_demo: bool,
    #[serde(flatten)]
    pub month: DemoMonth,
    pub news_entries: Vec<NewsJournalEntry>,
    pub dashboard: Dashboard,
}

/// Random sample data for the month of `?date=`. Nothing is stored.
pub async fn get_demo(
    State(state): State<AppState>,
    Query(query): Query<DemoQuery>,
) -> AppResult<Json<DemoResponse>> {
    let selected = key_or_today(&state, query.date.as_deref())?;
    let now = Utc::now();
    let month = generate_month(&mut rand::thread_rng(), &selected, now);

    // The sample grid ends with the sample month, not the real today.
    let dashboard = build_dashboard(
        &month.logs,
        selected.clone(),
        Locale::from_param(query.locale.as_deref()),
        Default::default(),
    );

    Ok(Json(DemoResponse {
        is_demo: true,
        news_entries: demo_news_entries(&selected, now),
        month,
        dashboard,
    }))
}
