//! Testing utilities
//!
//! - **[`time`]**: a [`RecordingSleeper`] that captures retry delays instead
//!   of waiting for them
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "test-utils")]
//! # {
//! use std::time::Duration;
//!
//! use gamelink_common::resilience::{policies::AlwaysRetry, RetryConfig, RetryExecutor};
//! use gamelink_common::testing::RecordingSleeper;
//!
//! # async fn example() {
//! let sleeper = RecordingSleeper::new();
//! let executor =
//!     RetryExecutor::new(RetryConfig::http_default(), AlwaysRetry).with_sleeper(sleeper.clone());
//!
//! let _ = executor.execute(|| async { Err::<(), _>("down") }).await;
//! assert_eq!(sleeper.recorded(), vec![Duration::from_millis(500), Duration::from_millis(1000)]);
//! # }
//! # }
//! ```

pub mod time;

pub use time::RecordingSleeper;
