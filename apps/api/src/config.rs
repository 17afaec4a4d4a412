use anyhow::{Context, Result};

use crate::model_client::{DEFAULT_MODEL_API_URL, DEFAULT_MODEL_ID};
use crate::simplifier::chunking::DEFAULT_MAX_TOKENS;

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub model_api_url: String,
    pub model_id: String,
    pub model_api_token: Option<String>,
    /// When unset, sessions live in process memory.
    pub redis_url: Option<String>,
    pub session_ttl_secs: u64,
    pub chunk_max_tokens: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            model_api_url: std::env::var("MODEL_API_URL")
                .unwrap_or_else(|_| DEFAULT_MODEL_API_URL.to_string()),
            model_id: std::env::var("MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string()),
            model_api_token: optional_env("MODEL_API_TOKEN"),
            redis_url: optional_env("REDIS_URL"),
            session_ttl_secs: parse_env("SESSION_TTL_SECS", 86_400)?,
            chunk_max_tokens: parse_env("CHUNK_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
        })
    }

    /// Full inference endpoint for the configured model.
    pub fn model_endpoint(&self) -> String {
        format!("{}/{}", self.model_api_url.trim_end_matches('/'), self.model_id)
    }
}

/// Returns the variable's value, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
