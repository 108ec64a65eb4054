//! Deterministic delays for retry tests

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::resilience::Sleeper;

/// Sleeper that records every requested delay and returns immediately
///
/// Clones share the same log, so a test can keep one handle while the
/// executor owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Create a sleeper with an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order
    pub fn recorded(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }

    /// Sum of all requested delays
    pub fn total(&self) -> Duration {
        self.delays.lock().iter().sum()
    }

    /// Forget all recorded delays
    pub fn reset(&self) {
        self.delays.lock().clear();
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        self.delays.lock().push(delay);
        tokio::task::yield_now().await;
    }
}
