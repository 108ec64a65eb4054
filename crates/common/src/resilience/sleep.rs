//! Delay primitive used between retry attempts
//!
//! The retry engine never calls `tokio::time::sleep` directly; it suspends
//! through a [`Sleeper`] so tests can observe the backoff schedule without
//! waiting for it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Asynchronous delay between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend the current task for `delay`
    async fn sleep(&self, delay: Duration);
}

/// Production sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Implement Sleeper for Arc<T> so a single sleeper can back many executors
#[async_trait]
impl<T: Sleeper + ?Sized> Sleeper for Arc<T> {
    async fn sleep(&self, delay: Duration) {
        (**self).sleep(delay).await;
    }
}
