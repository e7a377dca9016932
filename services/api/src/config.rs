//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub openai_api_key: String,
    pub openai_organization: Option<String>,
    /// Overrides the provider base URL, e.g. for a proxy. `None` means api.openai.com.
    pub openai_api_base: Option<String>,
    pub request_timeout: Duration,
    pub whisper_model: String,
    pub chat_model: String,
    pub translation_model: String,
    pub suggestion_model: String,
    pub analysis_model: String,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| var(key).ok_or_else(|| ConfigError::MissingVar(key.to_string()));
        let with_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        // --- Server and Database Settings ---
        let bind_address_str = with_default("BIND_ADDRESS", "0.0.0.0:3000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = required("DATABASE_URL")?;

        let log_level_str = with_default("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Provider Client Settings ---
        let openai_api_key = required("OPENAI_API_KEY")?;
        let openai_organization = var("OPENAI_ORGANIZATION");
        let openai_api_base = var("OPENAI_API_BASE").map(|base| base.trim().trim_end_matches('/').to_string());

        let timeout_str = with_default("REQUEST_TIMEOUT_SECS", "60");
        let timeout_secs = timeout_str
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "REQUEST_TIMEOUT_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", timeout_str),
                )
            })?;

        // --- Model Selection ---
        let whisper_model = with_default("WHISPER_MODEL", "whisper-1");
        let chat_model = with_default("CHAT_MODEL", "gpt-4o-mini");
        let translation_model = with_default("TRANSLATION_MODEL", "gpt-4o-mini");
        let suggestion_model = with_default("SUGGESTION_MODEL", "gpt-4o-mini");
        let analysis_model = with_default("ANALYSIS_MODEL", "gpt-4o");

        let cors_origin = with_default("CORS_ORIGIN", "http://localhost:3000");

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            openai_api_key,
            openai_organization,
            openai_api_base,
            request_timeout: Duration::from_secs(timeout_secs),
            whisper_model,
            chat_model,
            translation_model,
            suggestion_model,
            analysis_model,
            cors_origin,
        })
    }
}
