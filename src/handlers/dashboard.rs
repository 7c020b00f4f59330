use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::AuthUser;
use crate::calendar::DateKey;
use crate::error::{AppError, AppResult};
use crate::handlers::split_filter;
use crate::models::category::{Locale, Palette};
use crate::models::daily_log::DailyLog;
use crate::services::heatmap::{self, Heatmap, HeatmapInput};
use crate::services::trends::{self, Trends};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub locale: Option<String>,
    pub primary: Option<String>,
    pub mental: Option<String>,
    pub daily: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HeatmapQuery {
    pub locale: Option<String>,
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaletteHeatmap {
    pub palette: Palette,
    #[serde(flatten)]
    pub heatmap: Heatmap,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub today: DateKey,
    pub locale: Locale,
    pub trends: Trends,
    pub primary_activity: PaletteHeatmap,
    pub mental_world: PaletteHeatmap,
    pub daily_life: PaletteHeatmap,
}

/// One palette's heatmap over `logs`, which must be ascending by key.
pub fn palette_heatmap(
    palette: Palette,
    logs: &[DailyLog],
    filter: &[String],
    today: &DateKey,
    locale: Locale,
) -> PaletteHeatmap {
    let occurrences = heatmap::occurrences_for(palette, logs);
    let timeline: Vec<DateKey> = logs.iter().map(|l| l.logical_date.clone()).collect();

    PaletteHeatmap {
        palette,
        heatmap: heatmap::aggregate(HeatmapInput {
            occurrences: &occurrences,
            catalog: palette.catalog(),
            filter,
            timeline: &timeline,
            today,
            locale,
        }),
    }
}

pub fn build_dashboard(
    logs: &[DailyLog],
    today: DateKey,
    locale: Locale,
    filters: [Vec<String>; 3],
) -> Dashboard {
    let [primary, mental, daily] = filters;
    Dashboard {
        trends: trends::summarize(logs, locale),
        primary_activity: palette_heatmap(Palette::PrimaryActivity, logs, &primary, &today, locale),
        mental_world: palette_heatmap(Palette::MentalWorld, logs, &mental, &today, locale),
        daily_life: palette_heatmap(Palette::DailyLife, logs, &daily, &today, locale),
        today,
        locale,
    }
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<Dashboard>> {
    let logs = state.journal.list(auth_user.id).await?;
    let filters = [
        split_filter(query.primary.as_deref()),
        split_filter(query.mental.as_deref()),
        split_filter(query.daily.as_deref()),
    ];

    Ok(Json(build_dashboard(
        &logs,
        state.clock.today_key(),
        Locale::from_param(query.locale.as_deref()),
        filters,
    )))
}

pub async fn get_heatmap(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(palette): Path<String>,
    Query(query): Query<HeatmapQuery>,
) -> AppResult<Json<PaletteHeatmap>> {
    let palette = Palette::from_path(&palette)
        .ok_or_else(|| AppError::NotFound(format!("Unknown palette: {palette}")))?;
    let logs = state.journal.list(auth_user.id).await?;

    Ok(Json(palette_heatmap(
        palette,
        &logs,
        &split_filter(query.filter.as_deref()),
        &state.clock.today_key(),
        Locale::from_param(query.locale.as_deref()),
    )))
}
