//! Application constants
//!
//! Business error codes returned in the envelope `code` field, and the
//! user-facing messages attached to each error category.

/// Business error codes used by the GameLink backend
pub mod codes {
    pub const UNKNOWN_ERROR: i64 = -1;
    pub const SUCCESS: i64 = 0;

    // Request validation
    pub const INVALID_PARAMS: i64 = 1001;
    pub const MISSING_REQUIRED_FIELD: i64 = 1002;
    pub const INVALID_FORMAT: i64 = 1003;

    // Authentication
    pub const UNAUTHORIZED: i64 = 2001;
    pub const TOKEN_EXPIRED: i64 = 2002;
    pub const INVALID_TOKEN: i64 = 2003;

    // Authorization
    pub const FORBIDDEN: i64 = 3001;
    pub const INSUFFICIENT_PERMISSIONS: i64 = 3002;

    // Resources
    pub const RESOURCE_NOT_FOUND: i64 = 4001;
    pub const RESOURCE_ALREADY_EXISTS: i64 = 4002;
    pub const OPERATION_NOT_ALLOWED: i64 = 4003;

    // Payments
    pub const PAYMENT_FAILED: i64 = 5001;
    pub const INSUFFICIENT_BALANCE: i64 = 5002;
    pub const PAYMENT_TIMEOUT: i64 = 5003;
}

// Friendly messages per error category
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to reach the server. Please check your network connection.";
pub const AUTH_ERROR_MESSAGE: &str = "Your session has expired. Please sign in again.";
pub const CLIENT_ERROR_MESSAGE: &str = "The request was invalid. Please check your input.";
pub const SERVER_ERROR_MESSAGE: &str =
    "The service is temporarily unavailable. Please try again later.";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Message used when a failure envelope carries no message
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";
