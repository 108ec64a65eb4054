//! Typed API error and its classification
//!
//! Every failure surfaced by the request pipeline reaches the caller as an
//! [`ApiError`]. Classification looks only at the numeric `code`, which is
//! either a transport sentinel, an HTTP status, or a business code:
//!
//! | Category | Codes |
//! |----------|-------|
//! | Network  | `0`, `-1` |
//! | Auth     | `401`, `403` |
//! | Client   | `400..500` except `401`/`403` |
//! | Server   | `500..600` |
//! | Business | everything else (e.g. `4001`) |

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::constants::{
    codes, AUTH_ERROR_MESSAGE, CLIENT_ERROR_MESSAGE, GENERIC_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE,
    SERVER_ERROR_MESSAGE,
};

/// Code reported when the server could not be reached at all
pub const NETWORK_FAILURE_CODE: i64 = 0;

/// Error returned to callers of the GameLink API
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("[{code}] {message}")]
pub struct ApiError {
    /// HTTP status, business code, or a transport sentinel (`0`/`-1`)
    pub code: i64,
    pub message: String,
    /// Optional structured payload attached by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Mutually exclusive buckets an [`ApiError`] falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Network,
    Auth,
    Client,
    Server,
    Business,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Network => "network",
            Self::Auth => "auth",
            Self::Client => "client",
            Self::Server => "server",
            Self::Business => "business",
        };
        f.write_str(label)
    }
}

impl ApiError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), details: None }
    }

    /// Attach a structured payload
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Error carrying a bare HTTP status and the generic `HTTP <status>` message
    pub fn from_status(status: u16) -> Self {
        Self::new(i64::from(status), format!("HTTP {status}"))
    }

    /// Connection could not be established, or failed before a response
    pub const fn is_network_error(&self) -> bool {
        matches!(self.code, NETWORK_FAILURE_CODE | codes::UNKNOWN_ERROR)
    }

    pub const fn is_auth_error(&self) -> bool {
        matches!(self.code, 401 | 403)
    }

    /// 4xx other than 401/403
    pub const fn is_client_error(&self) -> bool {
        matches!(self.code, 400..=499) && !self.is_auth_error()
    }

    pub const fn is_server_error(&self) -> bool {
        matches!(self.code, 500..=599)
    }

    pub const fn category(&self) -> ErrorCategory {
        if self.is_network_error() {
            ErrorCategory::Network
        } else if self.is_auth_error() {
            ErrorCategory::Auth
        } else if self.is_client_error() {
            ErrorCategory::Client
        } else if self.is_server_error() {
            ErrorCategory::Server
        } else {
            ErrorCategory::Business
        }
    }

    /// Message suitable for showing to an end user
    ///
    /// Business errors keep the server's own message, falling back to a
    /// generic one when it is empty.
    pub fn friendly_message(&self) -> &str {
        match self.category() {
            ErrorCategory::Network => NETWORK_ERROR_MESSAGE,
            ErrorCategory::Auth => AUTH_ERROR_MESSAGE,
            ErrorCategory::Client => CLIENT_ERROR_MESSAGE,
            ErrorCategory::Server => SERVER_ERROR_MESSAGE,
            ErrorCategory::Business if self.message.trim().is_empty() => GENERIC_ERROR_MESSAGE,
            ErrorCategory::Business => self.message.as_str(),
        }
    }
}
