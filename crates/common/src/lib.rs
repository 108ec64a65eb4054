//! Modular common utilities shared across GameLink crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error classification
//! - `runtime`: async retry engine with exponential backoff
//! - `observability`: tracing (pulled in by `runtime`)
//! - `test-utils`: deterministic sleepers for exercising retry sequences

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(all(feature = "runtime", any(feature = "test-utils", test)))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{ErrorClassification, ErrorSeverity};
#[cfg(feature = "runtime")]
pub use resilience::{
    policies, retry, retry_with_policy, NoopObserver, ObserverFn, RetryConfig, RetryConfigBuilder,
    RetryConfigError, RetryDecision, RetryExecutor, RetryObserver, RetryOutcome, RetryPolicy,
    Sleeper, TokioSleeper,
};
