//! Resilience patterns for fault tolerance
//!
//! Currently a single pattern: a **generic retry engine** with exponential
//! backoff. It is generic over the operation's error type and decides
//! eligibility through a pluggable [`RetryPolicy`], so the same engine backs
//! HTTP requests and any other fallible async work.
//!
//! Delays go through the [`Sleeper`] trait. Production code uses
//! [`TokioSleeper`]; tests swap in a recording sleeper to inspect the
//! backoff schedule without waiting for it.
//!
//! ## Example
//!
//! ```rust
//! # #[cfg(feature = "runtime")]
//! # {
//! use std::time::Duration;
//!
//! use gamelink_common::resilience::{policies::AlwaysRetry, RetryConfig, RetryExecutor};
//!
//! # async fn example() -> Result<(), String> {
//! let config = RetryConfig::builder()
//!     .max_retries(2)
//!     .initial_delay(Duration::from_millis(500))
//!     .build()
//!     .map_err(|e| e.to_string())?;
//!
//! let executor = RetryExecutor::new(config, AlwaysRetry);
//! let value = executor.execute(|| async { Ok::<_, String>(42) }).await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! # }
//! ```

pub mod retry;
pub mod sleep;

pub use retry::{
    policies, retry, retry_with_policy, NoopObserver, ObserverFn, RetryConfig, RetryConfigBuilder,
    RetryConfigError, RetryDecision, RetryExecutor, RetryObserver, RetryOutcome, RetryPolicy,
};
pub use sleep::{Sleeper, TokioSleeper};
