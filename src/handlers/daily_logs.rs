use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::auth::middleware::AuthUser;
use crate::calendar::MonthWindow;
use crate::error::AppResult;
use crate::handlers::key_or_today;
use crate::models::daily_log::{
    CalendarResponse, DailyLog, DailyLogQuery, DailyLogResponse, MonthQuery, UpsertDailyLogRequest,
};
use crate::AppState;

pub async fn get_daily_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DailyLogQuery>,
) -> AppResult<Json<DailyLogResponse>> {
    let key = key_or_today(&state, query.date.as_deref())?;
    let log = state.journal.find_by_key(auth_user.id, &key).await?;

    Ok(Json(DailyLogResponse {
        logical_date: key,
        log,
    }))
}

/// Saves replace the whole form; fields left out of the body are cleared.
pub async fn upsert_daily_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpsertDailyLogRequest>,
) -> AppResult<Json<DailyLog>> {
    let (key, fields) = body.into_fields()?;
    let key = key.unwrap_or_else(|| state.clock.today_key());

    let log = state.journal.upsert(auth_user.id, &key, &fields).await?;
    tracing::info!(user_id = %auth_user.id, logical_date = %key, "Daily log saved");

    Ok(Json(log))
}

/// Keys with a record in the requested month, for the calendar control.
pub async fn get_calendar(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<CalendarResponse>> {
    let window = MonthWindow::resolve(query.month.as_deref(), &state.clock.today_key());
    let logs = state
        .journal
        .find_by_range(auth_user.id, &window.start, &window.end)
        .await?;

    Ok(Json(CalendarResponse {
        dates: logs.into_iter().map(|l| l.logical_date).collect(),
        month: window.month,
        start: window.start,
        end: window.end,
    }))
}

/// Every log, or one month of them when `?month=` is given.
pub async fn list_daily_logs(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<Vec<DailyLog>>> {
    let logs = match query.month.as_deref() {
        None => state.journal.list(auth_user.id).await?,
        Some(month) => {
            let window = MonthWindow::resolve(Some(month), &state.clock.today_key());
            state
                .journal
                .find_by_range(auth_user.id, &window.start, &window.end)
                .await?
        }
    };

    Ok(Json(logs))
}
