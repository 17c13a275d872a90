//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BOBR_API_URL` - Backend API base URL (default: `http://localhost:5000/api`)
//! - `BOBR_STATE_DIR` - Directory for the token and cart snapshots
//!   (default: `.bobr` under `$HOME`, or `./.bobr` if `$HOME` is unset)
//! - `BOBR_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 10)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API base URL, without a trailing slash
    pub api_url: Url,
    /// Directory holding the persisted token and cart snapshots
    pub state_dir: PathBuf,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_env_or_default("BOBR_API_URL", DEFAULT_API_URL))?;

        let state_dir = get_optional_env("BOBR_STATE_DIR").map_or_else(default_state_dir, PathBuf::from);

        let timeout_secs = get_env_or_default(
            "BOBR_HTTP_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar("BOBR_HTTP_TIMEOUT_SECS".to_string(), e.to_string()))?;

        Ok(Self {
            api_url,
            state_dir,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Default state directory: `$HOME/.bobr`, falling back to `./.bobr`.
fn default_state_dir() -> PathBuf {
    std::env::var("HOME").map_or_else(|_| PathBuf::from(".bobr"), |home| PathBuf::from(home).join(".bobr"))
}

/// Parse and normalize the API base URL (trailing slash stripped).
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim_end_matches('/');
    Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidEnvVar("BOBR_API_URL".to_string(), e.to_string()))
}
