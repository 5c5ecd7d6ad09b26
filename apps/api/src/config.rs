use anyhow::{Context, Result};

use crate::session::store::DEFAULT_IDLE_TTL_MINUTES;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Reject model responses that do not satisfy the declared schema.
    pub strict_validation: bool,
    /// Minutes a session may sit untouched before it is dropped.
    pub session_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            strict_validation: std::env::var("STRICT_RESPONSE_VALIDATION")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            session_ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .unwrap_or_else(|_| DEFAULT_IDLE_TTL_MINUTES.to_string())
                .parse::<i64>()
                .context("SESSION_TTL_MINUTES must be a whole number of minutes")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
