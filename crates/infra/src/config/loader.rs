//! Configuration loader
//!
//! Loads the API client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the base URL is not set there, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `GAMELINK_API_BASE_URL`: API origin (required)
//! - `GAMELINK_TOKEN_KEY`: Token storage key
//! - `GAMELINK_USER_AGENT`: `User-Agent` header value
//! - `GAMELINK_HTTP_MAX_RETRIES`: Retries after the first attempt
//! - `GAMELINK_HTTP_INITIAL_DELAY_MS`: Delay before the first retry
//! - `GAMELINK_HTTP_BACKOFF_FACTOR`: Multiplier applied per retry
//! - `GAMELINK_HTTP_MAX_DELAY_MS`: Upper bound for a single delay
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./gamelink.{toml,json}` or `./config.{toml,json}` (current working
//!    directory)
//! 2. The same names in the parent and grandparent directories
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use gamelink_common::resilience::RetryConfig;
use gamelink_domain::{ApiConfig, GameLinkError, Result, RetrySettings};

const CONFIG_FILE_NAMES: [&str; 4] = ["gamelink.toml", "gamelink.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `GameLinkError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
pub fn load() -> Result<ApiConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `GAMELINK_API_BASE_URL` is required; every other variable falls back
/// to its default.
///
/// # Errors
/// Returns `GameLinkError::Config` if the base URL is missing or a numeric
/// variable cannot be parsed.
pub fn load_from_env() -> Result<ApiConfig> {
    let defaults = RetrySettings::default();

    let base_url = env_var("GAMELINK_API_BASE_URL")?;
    let token_storage_key =
        std::env::var("GAMELINK_TOKEN_KEY").unwrap_or_else(|_| ApiConfig::default().token_storage_key);
    let user_agent = std::env::var("GAMELINK_USER_AGENT").ok().filter(|agent| !agent.is_empty());

    let retry = RetrySettings {
        max_retries: env_parse("GAMELINK_HTTP_MAX_RETRIES", defaults.max_retries)?,
        initial_delay_ms: env_parse("GAMELINK_HTTP_INITIAL_DELAY_MS", defaults.initial_delay_ms)?,
        backoff_factor: env_parse("GAMELINK_HTTP_BACKOFF_FACTOR", defaults.backoff_factor)?,
        max_delay_ms: env_parse("GAMELINK_HTTP_MAX_DELAY_MS", defaults.max_delay_ms)?,
    };

    Ok(ApiConfig { base_url, token_storage_key, user_agent, retry })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `GameLinkError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ApiConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(GameLinkError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            GameLinkError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| GameLinkError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Convert raw retry settings into a validated retry configuration
///
/// # Errors
/// Returns `GameLinkError::Config` if the settings violate the retry
/// constraints (initial delay under 1ms, factor below 1, max below initial).
pub fn retry_config(settings: &RetrySettings) -> Result<RetryConfig> {
    RetryConfig::builder()
        .max_retries(settings.max_retries)
        .initial_delay(Duration::from_millis(settings.initial_delay_ms))
        .backoff_factor(settings.backoff_factor)
        .max_delay(Duration::from_millis(settings.max_delay_ms))
        .build()
        .map_err(|e| GameLinkError::Config(format!("Invalid retry settings: {e}")))
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ApiConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| GameLinkError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| GameLinkError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(GameLinkError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent and grandparent, then
/// the directory holding the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        GameLinkError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional environment variable, using `default` when unset
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| GameLinkError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}
