use std::env;
use std::str::FromStr;

use chrono_tz::Tz;

use crate::calendar::DEFAULT_BOUNDARY_HOUR;

#[derive(Debug, Clone, Default)]
pub struct NewsFeedConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
}

impl NewsFeedConfig {
    fn from_env(url_var: &str, key_var: &str) -> Self {
        Self {
            url: non_empty(url_var),
            api_key: non_empty(key_var),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Absent means the process keeps everything in memory.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub journal_timezone: Tz,
    pub day_boundary_hour: u32,

    pub session_ttl_secs: i64,
    pub secure_cookies: bool,

    pub auth_rate_limit_max: u32,
    pub auth_rate_limit_window_secs: u64,

    pub news_zh: NewsFeedConfig,
    pub news_en: NewsFeedConfig,
    pub news_timeout_secs: u64,

    pub legacy_owner_email: Option<String>,
    pub legacy_owner_password: Option<String>,
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: FromStr>(var: &str, default: T) -> T {
    match non_empty(var) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(var, value = %raw, "Unparseable setting, using default");
            default
        }),
    }
}

impl Config {
    pub fn from_env() -> Self {
        let journal_timezone = match non_empty("JOURNAL_TIMEZONE") {
            None => Tz::UTC,
            Some(name) => name.parse().unwrap_or_else(|_| {
                tracing::warn!(timezone = %name, "Unknown JOURNAL_TIMEZONE, using UTC");
                Tz::UTC
            }),
        };

        let day_boundary_hour = parsed("DAY_BOUNDARY_HOUR", DEFAULT_BOUNDARY_HOUR);
        let day_boundary_hour = if day_boundary_hour < 24 {
            day_boundary_hour
        } else {
            tracing::warn!(day_boundary_hour, "DAY_BOUNDARY_HOUR out of range, using default");
            DEFAULT_BOUNDARY_HOUR
        };

        Self {
            database_url: non_empty("DATABASE_URL"),
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parsed("PORT", 8080),
            frontend_url: non_empty("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".into()),
            cors_extra_origins: non_empty("CORS_EXTRA_ORIGINS")
                .map(|extra| {
                    extra
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            journal_timezone,
            day_boundary_hour,

            session_ttl_secs: parsed("SESSION_TTL_SECS", 60 * 60 * 24 * 30),
            secure_cookies: parsed("SECURE_COOKIES", false),

            auth_rate_limit_max: parsed("AUTH_RATE_LIMIT_MAX", 5),
            auth_rate_limit_window_secs: parsed("AUTH_RATE_LIMIT_WINDOW_SECS", 60),

            news_zh: NewsFeedConfig::from_env("NEWS_ZH_API_URL", "NEWS_ZH_API_KEY"),
            news_en: NewsFeedConfig::from_env("NEWS_EN_API_URL", "NEWS_EN_API_KEY"),
            news_timeout_secs: parsed("NEWS_TIMEOUT_SECS", 10),

            legacy_owner_email: non_empty("LEGACY_OWNER_EMAIL").map(|e| e.to_lowercase()),
            legacy_owner_password: non_empty("LEGACY_OWNER_PASSWORD"),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    /// In-memory, UTC, development settings.
    fn default() -> Self {
        Self {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 8080,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            journal_timezone: Tz::UTC,
            day_boundary_hour: DEFAULT_BOUNDARY_HOUR,
            session_ttl_secs: 60 * 60 * 24 * 30,
            secure_cookies: false,
            auth_rate_limit_max: 5,
            auth_rate_limit_window_secs: 60,
            news_zh: NewsFeedConfig::default(),
            news_en: NewsFeedConfig::default(),
            news_timeout_secs: 10,
            legacy_owner_email: None,
            legacy_owner_password: None,
        }
    }
}
