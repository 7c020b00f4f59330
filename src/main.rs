use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

mod auth;
mod calendar;
mod config;
mod db;
mod error;
mod handlers;
mod maintenance;
mod models;
mod routes;
mod services;

use auth::rate_limit::RateLimitState;
use calendar::JournalClock;
use config::Config;
use db::{AccountStore, JournalStore, MemoryStore, PgStore};

#[derive(Clone)]
pub struct AppState {
    pub journal: Arc<dyn JournalStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub config: Arc<Config>,
    pub clock: JournalClock,
    pub http: reqwest::Client,
    pub rate_limiter: RateLimitState,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chronos_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    let (journal, accounts): (Arc<dyn JournalStore>, Arc<dyn AccountStore>) =
        match config.database_url.as_deref() {
            Some(url) => {
                let store = Arc::new(PgStore::new(db::connect_and_migrate(url).await?));
                (store.clone(), store)
            }
            None => {
                tracing::warn!("DATABASE_URL is not set, records are kept in memory only");
                let store = Arc::new(MemoryStore::new());
                (store.clone(), store)
            }
        };

    let adoption = maintenance::adopt_legacy_records(
        accounts.as_ref(),
        journal.as_ref(),
        config.legacy_owner_email.as_deref(),
        config.legacy_owner_password.as_deref(),
    )
    .await?;
    tracing::debug!(?adoption, "Legacy record adoption finished");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.news_timeout_secs))
        .user_agent(concat!("chronos-api/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let rate_limiter = RateLimitState::new(
        config.auth_rate_limit_max,
        config.auth_rate_limit_window_secs,
    );
    rate_limiter.spawn_cleanup();

    let clock = JournalClock::new(config.journal_timezone, config.day_boundary_hour);
    tracing::info!(
        timezone = %config.journal_timezone,
        boundary_hour = config.day_boundary_hour,
        today = %clock.today_key(),
        "Journal clock ready"
    );

    let state = AppState {
        journal,
        accounts,
        config: config.clone(),
        clock,
        http,
        rate_limiter,
    };

    let app = routes::router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    // Connect info carries the client IP used by the auth rate limiter.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
