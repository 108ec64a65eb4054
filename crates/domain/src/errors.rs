//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for GameLink setup and plumbing
///
/// Failures returned by the API itself are [`crate::ApiError`]; this type
/// covers the setup around it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum GameLinkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for GameLink operations
pub type Result<T> = std::result::Result<T, GameLinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serializes_with_tag() {
        let err = GameLinkError::Config("missing base_url".to_string());
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json, serde_json::json!({"type": "Config", "message": "missing base_url"}));
        assert_eq!(err.to_string(), "Configuration error: missing base_url");
    }

    #[test]
    fn test_internal_error_round_trips() {
        let err = GameLinkError::Internal("tls backend unavailable".to_string());
        let json = serde_json::to_string(&err).unwrap();

        assert_eq!(serde_json::from_str::<GameLinkError>(&json).unwrap(), err);
        assert_eq!(err.to_string(), "Internal error: tls backend unavailable");
    }
}
