use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values are errors.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Enables the LLM enhancement backend when present.
    pub anthropic_api_key: Option<String>,
    pub enhancement_timeout: Duration,
    pub enable_ai_skill_extraction: bool,
    pub rate_limit_requests: usize,
    pub rate_limit_window: Duration,
    /// Key the rate limiter on the first `X-Forwarded-For` hop. Only safe
    /// behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
    pub max_upload_bytes: usize,
    pub batch_concurrency: usize,
    pub batch_deadline: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            anthropic_api_key: None,
            enhancement_timeout: Duration::from_secs(15),
            enable_ai_skill_extraction: true,
            rate_limit_requests: 100,
            rate_limit_window: Duration::from_secs(60),
            trust_forwarded_for: false,
            max_upload_bytes: 10 * 1024 * 1024,
            batch_concurrency: 8,
            batch_deadline: Duration::from_secs(60),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (the environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: parse_or(&get, "PORT", defaults.port)?,
            rust_log: get("RUST_LOG").unwrap_or(defaults.rust_log),
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            enhancement_timeout: Duration::from_secs(parse_or(
                &get,
                "ENHANCEMENT_TIMEOUT_SECS",
                defaults.enhancement_timeout.as_secs(),
            )?),
            enable_ai_skill_extraction: parse_or(
                &get,
                "ENABLE_AI_SKILL_EXTRACTION",
                defaults.enable_ai_skill_extraction,
            )?,
            rate_limit_requests: parse_or(
                &get,
                "RATE_LIMIT_REQUESTS",
                defaults.rate_limit_requests,
            )?,
            rate_limit_window: Duration::from_secs(parse_or(
                &get,
                "RATE_LIMIT_WINDOW_SECS",
                defaults.rate_limit_window.as_secs(),
            )?),
            trust_forwarded_for: parse_or(
                &get,
                "TRUST_FORWARDED_FOR",
                defaults.trust_forwarded_for,
            )?,
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            batch_concurrency: parse_or(&get, "BATCH_CONCURRENCY", defaults.batch_concurrency)?,
            batch_deadline: Duration::from_secs(parse_or(
                &get,
                "BATCH_DEADLINE_SECS",
                defaults.batch_deadline.as_secs(),
            )?),
        })
    }
}

fn parse_or<G, T>(get: &G, key: &str, default: T) -> Result<T>
where
    G: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
