use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every external credential is optional: a missing database selects the
/// in-memory store, a missing trend token selects the fallback trend list and
/// a missing LLM key leaves that provider unconfigured.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub twitter_bearer_token: Option<String>,
    pub twitter_woeid: u32,
    pub trend_cache_ttl_secs: u64,
    pub llm_timeout_secs: u64,
    pub llm_max_tokens: u32,
    pub llm_temperature: f32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            twitter_bearer_token: optional_env("TWITTER_BEARER_TOKEN"),
            twitter_woeid: parse_env("TWITTER_WOEID", 1)?,
            trend_cache_ttl_secs: parse_env("TREND_CACHE_TTL_SECS", 15 * 60)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 60)?,
            llm_max_tokens: parse_env("LLM_MAX_TOKENS", 2000)?,
            llm_temperature: parse_env("LLM_TEMPERATURE", 0.7)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a variable, treating an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable name so they can run in parallel.

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u64 = parse_env("LIFEBOARD_TEST_UNSET_VAR", 900).unwrap();
        assert_eq!(value, 900);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("LIFEBOARD_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("LIFEBOARD_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
    }

    #[test]
    fn test_optional_env_treats_blank_as_missing() {
        std::env::set_var("LIFEBOARD_TEST_BLANK", "   ");
        assert!(optional_env("LIFEBOARD_TEST_BLANK").is_none());
    }
}
