//! Failures produced by the request pipeline
//!
//! [`RequestFailure`] is the closed set of ways a single request can fail.
//! The retry policy matches on its variants; callers only ever see the
//! [`gamelink_domain::ApiError`] it converts into.

mod conversions;

use gamelink_common::error::{ErrorClassification, ErrorSeverity};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Why one request attempt failed
#[derive(Debug, Error)]
pub enum RequestFailure {
    /// No response was received (refused connection, reset, DNS, TLS)
    #[error("transport failure: {message}")]
    Transport { message: String },

    /// The server answered with an error status; the body is kept for
    /// envelope validation once retries are over
    #[error("HTTP {}", .status.as_u16())]
    HttpStatus { status: StatusCode, body: Vec<u8> },

    /// The response body is not a valid envelope
    #[error("HTTP {}: response is not a valid envelope", .status.as_u16())]
    EnvelopeParse { status: StatusCode },

    /// A valid envelope with `success: false`
    #[error("[{code}] {message}")]
    Application { code: i64, message: String, details: Option<Value> },

    /// The request could not be built locally
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl RequestFailure {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest { message: message.into() }
    }
}

impl ErrorClassification for RequestFailure {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::HttpStatus { status, .. } => status.is_server_error(),
            Self::EnvelopeParse { .. } | Self::Application { .. } | Self::InvalidRequest { .. } => {
                false
            }
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Transport { .. } => ErrorSeverity::Warning,
            Self::HttpStatus { status, .. } if status.is_server_error() => ErrorSeverity::Warning,
            Self::HttpStatus { .. } | Self::Application { .. } => ErrorSeverity::Info,
            Self::EnvelopeParse { .. } => ErrorSeverity::Error,
            Self::InvalidRequest { .. } => ErrorSeverity::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> RequestFailure {
        RequestFailure::HttpStatus {
            status: StatusCode::from_u16(code).unwrap(),
            body: Vec::new(),
        }
    }

    #[test]
    fn test_retryable_variants() {
        assert!(RequestFailure::Transport { message: "refused".into() }.is_retryable());
        assert!(status(500).is_retryable());
        assert!(status(503).is_retryable());
        assert!(status(599).is_retryable());

        assert!(!status(404).is_retryable());
        assert!(!status(401).is_retryable());
        assert!(!RequestFailure::EnvelopeParse { status: StatusCode::OK }.is_retryable());
        assert!(!RequestFailure::Application {
            code: 4001,
            message: "resource not found".into(),
            details: None
        }
        .is_retryable());
        assert!(!RequestFailure::invalid_request("bad url").is_retryable());
    }

    #[test]
    fn test_severity() {
        assert_eq!(status(502).severity(), ErrorSeverity::Warning);
        assert_eq!(status(409).severity(), ErrorSeverity::Info);
        assert!(RequestFailure::invalid_request("bad header").is_critical());
    }

    #[test]
    fn test_display() {
        assert_eq!(status(503).to_string(), "HTTP 503");
        assert_eq!(
            RequestFailure::EnvelopeParse { status: StatusCode::OK }.to_string(),
            "HTTP 200: response is not a valid envelope"
        );
    }
}
