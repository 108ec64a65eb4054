//! Error classification shared by every GameLink error type
//!
//! Error enums across the workspace describe *what* went wrong; this module
//! gives them a common vocabulary for *how* to react:
//!
//! - **`ErrorClassification`**: retryability, severity, criticality and an
//!   optional suggested delay
//! - **`ErrorSeverity`**: a unified level used for logging and alerting
//!
//! The retry engine's `ClassifiedRetry` policy is built on
//! [`ErrorClassification::is_retryable`], so an error type only has to
//! classify itself once to plug into retries.
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Business rule rejections |
//! | **Warning** | Degraded but operational | Transient network failures, 5xx |
//! | **Error** | Failure requiring attention | Malformed responses |
//! | **Critical** | System integrity at risk | Requests that cannot be built |
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use gamelink_common::error::{ErrorClassification, ErrorSeverity};
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     Offline,
//!     Rejected,
//! }
//!
//! impl ErrorClassification for FetchError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, Self::Offline)
//!     }
//!
//!     fn severity(&self) -> ErrorSeverity {
//!         match self {
//!             Self::Offline => ErrorSeverity::Warning,
//!             Self::Rejected => ErrorSeverity::Info,
//!         }
//!     }
//! }
//!
//! assert!(FetchError::Offline.is_retryable());
//! assert!(!FetchError::Rejected.is_critical());
//! assert_eq!(FetchError::Offline.retry_after(), None::<Duration>);
//! ```

use std::fmt;
use std::time::Duration;

/// Standard interface for classifying errors by their characteristics
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again, such as refused connections or temporary service
    /// unavailability.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for monitoring, alerting, and logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get the suggested retry delay if applicable
    ///
    /// Returns `None` when the caller's backoff schedule should decide.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational, typically an expected rejection
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Flaky {
        severity: ErrorSeverity,
    }

    impl ErrorClassification for Flaky {
        fn is_retryable(&self) -> bool {
            self.severity <= ErrorSeverity::Warning
        }

        fn severity(&self) -> ErrorSeverity {
            self.severity
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(ErrorSeverity::Info.to_string(), "INFO");
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
        assert_eq!(ErrorSeverity::Error.to_string(), "ERROR");
        assert_eq!(ErrorSeverity::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn test_default_is_critical_follows_severity() {
        assert!(Flaky { severity: ErrorSeverity::Critical }.is_critical());
        assert!(!Flaky { severity: ErrorSeverity::Error }.is_critical());
    }

    #[test]
    fn test_default_retry_after_is_none() {
        assert_eq!(Flaky { severity: ErrorSeverity::Warning }.retry_after(), None);
    }
}
