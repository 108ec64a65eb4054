//! Generic retry engine with exponential backoff
//!
//! Wraps any fallible async operation and re-runs it according to an
//! immutable [`RetryConfig`], a [`RetryPolicy`] deciding which failures are
//! worth another attempt, and an optional [`RetryObserver`] side channel.
//!
//! # Attempt accounting
//!
//! Attempts are numbered from 1. With `max_retries = n` the operation runs at
//! most `n + 1` times. After a failed attempt `k`:
//! - if `k == n + 1` the sequence is exhausted and the error propagates
//! - otherwise the policy is consulted; `Stop` propagates immediately
//! - otherwise the observer is notified and the executor waits
//!   `min(initial_delay * backoff_factor^(k-1), max_delay)`
//!
//! The error handed back to the caller is always the last one the operation
//! produced, never a wrapper.

use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::sleep::{Sleeper, TokioSleeper};

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default delay before the first retry
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);
/// Default multiplier applied per retry
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;
/// Default upper bound for a single delay
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(10_000);

/// Errors raised when a retry configuration violates its domain constraints
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetryConfigError {
    /// Initial delay shorter than one millisecond
    #[error("initial_delay must be at least 1ms, got {initial_delay:?}")]
    InitialDelayTooShort { initial_delay: Duration },

    /// Backoff factor below 1 or not finite
    #[error("backoff_factor must be a finite number >= 1, got {factor}")]
    InvalidBackoffFactor { factor: f64 },

    /// Maximum delay below the initial delay
    #[error("max_delay ({max_delay:?}) must be >= initial_delay ({initial_delay:?})")]
    MaxDelayBelowInitial { initial_delay: Duration, max_delay: Duration },
}

/// Immutable, validated retry configuration
///
/// Build one through [`RetryConfig::builder`] or use a named preset; there is
/// no way to obtain a `RetryConfig` that violates its constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    max_retries: u32,
    initial_delay: Duration,
    backoff_factor: f64,
    max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryConfig {
    /// Create a configuration builder seeded with the defaults
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::new()
    }

    /// Preset used by the HTTP request pipeline: 2 retries starting at 500ms
    pub fn http_default() -> Self {
        Self { max_retries: 2, initial_delay: Duration::from_millis(500), ..Self::default() }
    }

    /// Number of retries allowed after the first attempt
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total number of attempts allowed (first attempt plus retries)
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before the first retry
    pub const fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Multiplier applied to the delay for each further retry
    pub const fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    /// Upper bound for any single delay
    pub const fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), RetryConfigError> {
        if self.initial_delay < Duration::from_millis(1) {
            return Err(RetryConfigError::InitialDelayTooShort {
                initial_delay: self.initial_delay,
            });
        }

        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(RetryConfigError::InvalidBackoffFactor { factor: self.backoff_factor });
        }

        if self.max_delay < self.initial_delay {
            return Err(RetryConfigError::MaxDelayBelowInitial {
                initial_delay: self.initial_delay,
                max_delay: self.max_delay,
            });
        }

        Ok(())
    }

    /// Delay to wait after failed attempt `attempt` (1-based)
    ///
    /// `min(initial_delay * backoff_factor^(attempt-1), max_delay)`, rounded
    /// to whole milliseconds and never above `max_delay`. Overflow saturates
    /// to `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let initial_ms = self.initial_delay.as_secs_f64() * 1000.0;
        let max_ms = self.max_delay.as_secs_f64() * 1000.0;
        let delay_ms = initial_ms * self.backoff_factor.powi(exponent);

        if !delay_ms.is_finite() || delay_ms >= max_ms {
            return self.max_delay;
        }

        Duration::from_millis(delay_ms.round() as u64).min(self.max_delay)
    }
}

/// Builder for RetryConfig with fluent API
#[derive(Debug)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl Default for RetryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfigBuilder {
    pub fn new() -> Self {
        Self { config: RetryConfig::default() }
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.config.initial_delay = delay;
        self
    }

    pub fn backoff_factor(mut self, factor: f64) -> Self {
        self.config.backoff_factor = factor;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.max_delay = delay;
        self
    }

    pub fn build(self) -> Result<RetryConfig, RetryConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Decision for whether to retry an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the operation after the configured backoff delay
    Retry,
    /// Don't retry; propagate the error now
    Stop,
}

impl From<bool> for RetryDecision {
    fn from(retry: bool) -> Self {
        if retry {
            Self::Retry
        } else {
            Self::Stop
        }
    }
}

/// Trait for determining whether an error should be retried
pub trait RetryPolicy<E> {
    /// Decide whether failed attempt `attempt` (1-based) gets another try
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision;
}

/// Side channel notified before each backoff wait
///
/// Observers are for diagnostics only. A panicking observer is caught and
/// logged; it never alters the retry sequence or the propagated error.
pub trait RetryObserver<E> {
    /// Called after failed attempt `attempt` with the delay about to be waited
    fn on_retry(&self, error: &E, attempt: u32, delay: Duration);
}

/// Observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<E> RetryObserver<E> for NoopObserver {
    fn on_retry(&self, _error: &E, _attempt: u32, _delay: Duration) {}
}

/// Closure-backed observer
#[derive(Debug, Clone)]
pub struct ObserverFn<F>(pub F);

impl<F, E> RetryObserver<E> for ObserverFn<F>
where
    F: Fn(&E, u32, Duration),
{
    fn on_retry(&self, error: &E, attempt: u32, delay: Duration) {
        (self.0)(error, attempt, delay);
    }
}

/// Outcome of a retry execution including result and summary statistics.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    /// Number of times the operation was invoked
    pub attempts: u32,
    /// Sum of all backoff delays waited
    pub total_delay: Duration,
    /// Whether the sequence ended because the attempt budget ran out
    pub exhausted: bool,
}

impl<T, E> RetryOutcome<T, E> {
    /// Consume the outcome and return only the result.
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }

    /// Get the average delay between attempts (excludes operation execution
    /// time).
    pub fn average_delay(&self) -> Duration {
        if self.attempts <= 1 {
            return Duration::ZERO;
        }
        self.total_delay / (self.attempts - 1)
    }
}

/// The main retry executor
pub struct RetryExecutor<P, O = NoopObserver, S = TokioSleeper> {
    config: RetryConfig,
    policy: P,
    observer: O,
    sleeper: S,
}

impl<P> RetryExecutor<P> {
    /// Create a new retry executor with the given configuration and policy
    pub const fn new(config: RetryConfig, policy: P) -> Self {
        Self { config, policy, observer: NoopObserver, sleeper: TokioSleeper }
    }

    /// Create with default configuration
    pub fn with_policy(policy: P) -> Self {
        Self::new(RetryConfig::default(), policy)
    }
}

impl<P, O, S> RetryExecutor<P, O, S> {
    /// Replace the retry observer
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutor<P, O2, S> {
        RetryExecutor {
            config: self.config,
            policy: self.policy,
            observer,
            sleeper: self.sleeper,
        }
    }

    /// Replace the delay primitive
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RetryExecutor<P, O, S2> {
        RetryExecutor {
            config: self.config,
            policy: self.policy,
            observer: self.observer,
            sleeper,
        }
    }

    /// Configuration this executor runs with
    pub const fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute an operation with retry logic
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        P: RetryPolicy<E>,
        O: RetryObserver<E>,
        S: Sleeper,
        E: fmt::Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_with_outcome(operation).await.into_result()
    }

    /// Execute an operation with retry logic and return outcome statistics.
    #[instrument(skip_all, fields(max_retries = self.config.max_retries))]
    pub async fn execute_with_outcome<F, Fut, T, E>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        P: RetryPolicy<E>,
        O: RetryObserver<E>,
        S: Sleeper,
        E: fmt::Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.config.max_attempts();
        let mut attempt: u32 = 1;
        let mut total_delay = Duration::ZERO;

        loop {
            debug!(attempt, max_attempts, "executing operation");

            let error = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "operation succeeded after retries");
                    }
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: attempt,
                        total_delay,
                        exhausted: false,
                    };
                }
                Err(error) => error,
            };

            if attempt >= max_attempts {
                warn!(attempts = attempt, error = ?error, "all retry attempts exhausted");
                return RetryOutcome {
                    result: Err(error),
                    attempts: attempt,
                    total_delay,
                    exhausted: true,
                };
            }

            if self.policy.should_retry(&error, attempt) == RetryDecision::Stop {
                debug!(attempt, error = ?error, "retry policy determined not to retry");
                return RetryOutcome {
                    result: Err(error),
                    attempts: attempt,
                    total_delay,
                    exhausted: false,
                };
            }

            let delay = self.config.delay_for_attempt(attempt);
            self.notify_observer(&error, attempt, delay);

            debug!(attempt, delay_ms = delay.as_millis() as u64, "backing off before retry");
            self.sleeper.sleep(delay).await;
            total_delay = total_delay.saturating_add(delay);
            attempt += 1;
        }
    }

    fn notify_observer<E>(&self, error: &E, attempt: u32, delay: Duration)
    where
        O: RetryObserver<E>,
    {
        let notified =
            panic::catch_unwind(AssertUnwindSafe(|| self.observer.on_retry(error, attempt, delay)));
        if notified.is_err() {
            warn!(attempt, "retry observer panicked; continuing retry sequence");
        }
    }
}

/// Convenience function to create a retry executor and execute an operation
pub async fn retry_with_policy<F, Fut, T, E, P>(
    config: RetryConfig,
    policy: P,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: RetryPolicy<E>,
    E: fmt::Debug,
{
    let executor = RetryExecutor::new(config, policy);
    executor.execute(operation).await
}

/// Retry using the error's own classification to decide eligibility
pub async fn retry<F, Fut, T, E>(config: RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: crate::error::ErrorClassification + fmt::Debug,
{
    retry_with_policy(config, policies::ClassifiedRetry, operation).await
}

/// Pre-defined retry policies for common scenarios
pub mod policies {
    use super::{RetryDecision, RetryPolicy};
    use crate::error::ErrorClassification;

    /// Always retry policy - retries on any error
    #[derive(Debug, Clone, Copy, Default)]
    pub struct AlwaysRetry;

    impl<E> RetryPolicy<E> for AlwaysRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Retry
        }
    }

    /// Never retry policy - never retries
    #[derive(Debug, Clone, Copy, Default)]
    pub struct NeverRetry;

    impl<E> RetryPolicy<E> for NeverRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Stop
        }
    }

    /// Retries exactly the errors that classify themselves as retryable
    #[derive(Debug, Clone, Copy, Default)]
    pub struct ClassifiedRetry;

    impl<E: ErrorClassification> RetryPolicy<E> for ClassifiedRetry {
        fn should_retry(&self, error: &E, _attempt: u32) -> RetryDecision {
            error.is_retryable().into()
        }
    }

    /// Predicate-based retry policy
    #[derive(Debug, Clone)]
    pub struct PredicateRetry<F> {
        predicate: F,
    }

    impl<F> PredicateRetry<F> {
        pub const fn new(predicate: F) -> Self {
            Self { predicate }
        }
    }

    impl<F, E> RetryPolicy<E> for PredicateRetry<F>
    where
        F: Fn(&E, u32) -> bool,
    {
        fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision {
            (self.predicate)(error, attempt).into()
        }
    }
}
