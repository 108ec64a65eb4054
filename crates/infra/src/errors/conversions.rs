//! Conversions between transport errors, pipeline failures and the domain
//! error handed to callers.

use gamelink_domain::constants::codes;
use gamelink_domain::types::api_error::NETWORK_FAILURE_CODE;
use gamelink_domain::ApiError;
use reqwest::Error as HttpError;

use super::RequestFailure;

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RequestFailure */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for RequestFailure {
    fn from(err: HttpError) -> Self {
        if err.is_builder() {
            return Self::InvalidRequest { message: err.to_string() };
        }

        #[cfg(not(target_arch = "wasm32"))]
        if err.is_connect() {
            return Self::Transport { message: format!("connection failed: {err}") };
        }

        Self::Transport { message: err.to_string() }
    }
}

/* -------------------------------------------------------------------------- */
/* RequestFailure → ApiError */
/* -------------------------------------------------------------------------- */

impl From<RequestFailure> for ApiError {
    fn from(failure: RequestFailure) -> Self {
        match failure {
            RequestFailure::Transport { message } => Self::new(NETWORK_FAILURE_CODE, message),
            RequestFailure::InvalidRequest { message } => Self::new(codes::UNKNOWN_ERROR, message),
            RequestFailure::HttpStatus { status, .. } | RequestFailure::EnvelopeParse { status } => {
                Self::from_status(status.as_u16())
            }
            RequestFailure::Application { code, message, details } => {
                Self { code, message, details }
            }
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
