//! Client configuration structures
//!
//! Loaded by `gamelink-infra::config` from the environment or a TOML/JSON
//! file. Every field has a default, so partial files are accepted.

use serde::{Deserialize, Serialize};

/// Default API origin used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
/// Default key the bearer token is stored under
pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "token";

/// Connection settings for the GameLink API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin prepended to every request path
    pub base_url: String,
    /// Key the bearer token is read from in the token store
    pub token_storage_key: String,
    /// Optional `User-Agent` header value
    pub user_agent: Option<String>,
    /// Backoff settings for the request pipeline
    pub retry: RetrySettings,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_storage_key: DEFAULT_TOKEN_STORAGE_KEY.to_string(),
            user_agent: None,
            retry: RetrySettings::default(),
        }
    }
}

/// Raw retry settings as they appear in configuration
///
/// Validated into a retry configuration by the infra loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub backoff_factor: f64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self { max_retries: 2, initial_delay_ms: 500, backoff_factor: 2.0, max_delay_ms: 10_000 }
    }
}
