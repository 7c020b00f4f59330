use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::config::Config;
use crate::handlers;
use crate::AppState;

fn cors(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(&config.cors_extra_origins)
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/sign-up", post(handlers::auth::sign_up))
        .route("/api/auth/sign-in", post(handlers::auth::sign_in))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/api/auth/sign-out", post(handlers::auth::sign_out))
        .route("/api/categories", get(handlers::categories::list_categories))
        .route("/api/news", get(handlers::news::get_news))
        .route("/api/demo", get(handlers::demo::get_demo))
        .merge(auth_routes);

    let protected_routes = Router::new()
        .route("/api/me", get(handlers::auth::me))
        .route(
            "/api/daily-log",
            get(handlers::daily_logs::get_daily_log).put(handlers::daily_logs::upsert_daily_log),
        )
        .route(
            "/api/daily-log/calendar",
            get(handlers::daily_logs::get_calendar),
        )
        .route("/api/daily-logs", get(handlers::daily_logs::list_daily_logs))
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/api/heatmap/:palette", get(handlers::dashboard::get_heatmap))
        .route(
            "/api/news-journal",
            get(handlers::news::get_news_journal).post(handlers::news::save_news_entry),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors(&state.config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
