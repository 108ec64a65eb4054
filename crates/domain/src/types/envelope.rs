//! Response envelope wrapping every GameLink API payload
//!
//! On the wire:
//!
//! ```json
//! { "success": true,  "code": 0,    "message": "ok", "data": { ... } }
//! { "success": false, "code": 4001, "message": "resource not found", "data": null }
//! ```
//!
//! Parsing is strict about shape (`success` must be a boolean, `data` must
//! decode as `T`) and lenient about optional fields.

use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::api_error::ApiError;
use crate::constants::{codes, UNKNOWN_ERROR_MESSAGE};

/// Decoded response envelope
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success { code: i64, message: String, data: T },
    Failure { code: i64, message: String, details: Option<Value> },
}

#[derive(Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    details: Option<Value>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self::Success { code: codes::SUCCESS, message: String::new(), data }
    }

    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self::Failure { code, message: message.into(), details: None }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub const fn code(&self) -> i64 {
        match self {
            Self::Success { code, .. } | Self::Failure { code, .. } => *code,
        }
    }

    /// Unwrap the payload, turning a failure envelope into an [`ApiError`]
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { code, message, details } => Err(ApiError { code, message, details }),
        }
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Parse a response body
    ///
    /// A missing `code` defaults to `0` on success and `-1` on failure. A
    /// failure without `details` keeps a non-null `data` as its details.
    pub fn parse(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: RawEnvelope = serde_json::from_slice(bytes)?;

        if raw.success {
            let data = T::deserialize(raw.data)?;
            return Ok(Self::Success {
                code: raw.code.unwrap_or(codes::SUCCESS),
                message: raw.message.unwrap_or_default(),
                data,
            });
        }

        let message = raw
            .message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());
        let details = raw.details.or_else(|| (!raw.data.is_null()).then_some(raw.data));

        Ok(Self::Failure { code: raw.code.unwrap_or(codes::UNKNOWN_ERROR), message, details })
    }

    /// Parse a response body, treating anything malformed as absent
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        Self::parse(bytes).ok()
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { code, message, data } => {
                let mut state = serializer.serialize_struct("Envelope", 4)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("code", code)?;
                state.serialize_field("message", message)?;
                state.serialize_field("data", data)?;
                state.end()
            }
            Self::Failure { code, message, details } => {
                let len = if details.is_some() { 5 } else { 4 };
                let mut state = serializer.serialize_struct("Envelope", len)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("code", code)?;
                state.serialize_field("message", message)?;
                state.serialize_field("data", &Value::Null)?;
                if let Some(details) = details {
                    state.serialize_field("details", details)?;
                }
                state.end()
            }
        }
    }
}
