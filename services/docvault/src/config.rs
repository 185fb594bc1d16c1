//! services/docvault/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use docvault_core::ExportFormat;
use tracing::Level;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub session_cookie: Option<String>,
    pub log_level: Level,
    pub clear_selection_after_compare: bool,
    pub default_export_format: ExportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_cookie: None,
            log_level: Level::INFO,
            clear_selection_after_compare: false,
            default_export_format: ExportFormat::Pdf,
        }
    }
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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. `from_env` is the
    /// process-environment flavour of this.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Backend Settings ---
        let api_url = lookup("DOCVAULT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "DOCVAULT_API_URL".to_string(),
                format!("'{}' is not an http(s) URL", api_url),
            ));
        }
        let api_url = api_url.trim_end_matches('/').to_string();

        let session_cookie = lookup("DOCVAULT_SESSION_COOKIE").filter(|c| !c.trim().is_empty());

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Workflow Settings ---
        let clear_selection_after_compare = match lookup("CLEAR_SELECTION_AFTER_COMPARE") {
            None => false,
            Some(raw) => raw.trim().parse::<bool>().map_err(|_| {
                ConfigError::InvalidValue(
                    "CLEAR_SELECTION_AFTER_COMPARE".to_string(),
                    format!("'{}' is not true or false", raw),
                )
            })?,
        };

        let default_export_format = match lookup("DEFAULT_EXPORT_FORMAT") {
            None => ExportFormat::Pdf,
            Some(raw) => raw
                .parse::<ExportFormat>()
                .map_err(|e| ConfigError::InvalidValue("DEFAULT_EXPORT_FORMAT".to_string(), e))?,
        };

        Ok(Self {
            api_url,
            session_cookie,
            log_level,
            clear_selection_after_compare,
            default_export_format,
        })
    }
}
