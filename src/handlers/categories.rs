use axum::{extract::Query, Json};
use serde::Deserialize;

use crate::models::category::{CatalogResponse, Locale};

#[derive(Debug, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

pub async fn list_categories(Query(query): Query<LocaleQuery>) -> Json<CatalogResponse> {
    Json(CatalogResponse::for_locale(Locale::from_param(
        query.locale.as_deref(),
    )))
}
