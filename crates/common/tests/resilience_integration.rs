//! Integration tests for the resilience module
//!
//! Exercises the public retry API end to end with recorded delays, plus one
//! test against the real tokio timer.

#![cfg(feature = "test-utils")]

use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use gamelink_common::error::{ErrorClassification, ErrorSeverity};
use gamelink_common::resilience::{
    policies, retry, retry_with_policy, ObserverFn, RetryConfig, RetryExecutor,
};
use gamelink_common::testing::RecordingSleeper;
use parking_lot::Mutex;
use tracing_subscriber::fmt::MakeWriter;

/// Custom error type for testing
#[derive(Debug, Clone, PartialEq)]
struct TestError {
    message: String,
    retryable: bool,
}

impl TestError {
    fn transient(message: &str) -> Self {
        Self { message: message.to_string(), retryable: true }
    }

    fn permanent(message: &str) -> Self {
        Self { message: message.to_string(), retryable: false }
    }
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TestError {}

impl ErrorClassification for TestError {
    fn is_retryable(&self) -> bool {
        self.retryable
    }

    fn severity(&self) -> ErrorSeverity {
        if self.retryable {
            ErrorSeverity::Warning
        } else {
            ErrorSeverity::Error
        }
    }
}

/// Validates the canonical backoff schedule: two failures then a success with
/// 2 retries at 500ms doubling.
///
/// # Test Steps
/// 1. Operation fails on calls 1 and 2, succeeds on call 3
/// 2. Verify three calls were made
/// 3. Verify the recorded waits are exactly [500ms, 1000ms]
#[tokio::test]
async fn test_retry_backoff_schedule_then_success() {
    let calls = Arc::new(AtomicU32::new(0));
    let sleeper = RecordingSleeper::new();
    let executor = RetryExecutor::new(RetryConfig::http_default(), policies::AlwaysRetry)
        .with_sleeper(sleeper.clone());

    let result = executor
        .execute(|| {
            let calls = Arc::clone(&calls);
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(TestError::transient("flaky"))
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

    assert_eq!(result, Ok("ok"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(sleeper.recorded(), vec![Duration::from_millis(500), Duration::from_millis(1000)]);
    assert_eq!(sleeper.total(), Duration::from_millis(1500));
}

/// Validates that the error returned after exhaustion is the operation's own
/// last error, not a wrapper.
#[tokio::test]
async fn test_retry_exhaustion_returns_last_error_verbatim() {
    let calls = Arc::new(AtomicU32::new(0));
    let sleeper = RecordingSleeper::new();
    let config = RetryConfig::builder()
        .max_retries(2)
        .initial_delay(Duration::from_millis(100))
        .backoff_factor(3.0)
        .max_delay(Duration::from_millis(250))
        .build()
        .expect("valid config");
    let executor =
        RetryExecutor::new(config, policies::ClassifiedRetry).with_sleeper(sleeper.clone());

    let outcome = executor
        .execute_with_outcome(|| {
            let calls = Arc::clone(&calls);
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Err::<(), _>(TestError::transient(&format!("failure #{n}")))
            }
        })
        .await;

    assert!(outcome.exhausted);
    assert_eq!(outcome.attempts, 3);
    assert_eq!(outcome.result, Err(TestError::transient("failure #3")));
    assert_eq!(sleeper.recorded(), vec![Duration::from_millis(100), Duration::from_millis(250)]);
    assert_eq!(outcome.average_delay(), Duration::from_millis(175));
}

/// Validates that a non-retryable error stops the sequence immediately.
#[tokio::test]
async fn test_retry_short_circuits_on_permanent_error() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = Arc::clone(&calls);

    let result = retry(RetryConfig::default(), || {
        let calls = Arc::clone(&calls_clone);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(TestError::permanent("bad request"))
        }
    })
    .await;

    assert_eq!(result, Err(TestError::permanent("bad request")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// Validates that the observer is notified once per scheduled retry and never
/// after the final attempt.
#[tokio::test]
async fn test_observer_notified_before_each_wait() {
    let notes = Arc::new(Mutex::new(Vec::new()));
    let notes_clone = Arc::clone(&notes);
    let executor = RetryExecutor::new(RetryConfig::http_default(), policies::AlwaysRetry)
        .with_observer(ObserverFn(move |error: &TestError, attempt: u32, delay: Duration| {
            notes_clone.lock().push(format!("{attempt}:{}:{}", error.message, delay.as_millis()));
        }))
        .with_sleeper(RecordingSleeper::new());

    let result = executor.execute(|| async { Err::<(), _>(TestError::transient("down")) }).await;

    assert!(result.is_err());
    assert_eq!(*notes.lock(), vec!["1:down:500".to_string(), "2:down:1000".to_string()]);
}

/// Log sink shared with the test body
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Validates that a panicking observer is logged at warn and the retry
/// sequence still ends with the operation's own error.
#[tokio::test]
async fn test_observer_panic_is_logged_and_sequence_continues() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = Arc::clone(&calls);
    let sleeper = RecordingSleeper::new();
    let executor = RetryExecutor::new(RetryConfig::http_default(), policies::AlwaysRetry)
        .with_observer(ObserverFn(|_: &TestError, _: u32, _: Duration| panic!("observer bug")))
        .with_sleeper(sleeper.clone());

    let result = executor
        .execute(|| {
            let calls = Arc::clone(&calls_clone);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError::transient("still down"))
            }
        })
        .await;

    assert_eq!(result, Err(TestError::transient("still down")));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(sleeper.recorded().len(), 2);

    let output = logs.contents();
    assert_eq!(output.matches("retry observer panicked").count(), 2, "logs: {output}");
    assert!(output.contains("WARN"));
}

/// Validates retries against the real tokio timer with millisecond delays.
#[tokio::test(flavor = "multi_thread")]
async fn test_retry_waits_on_real_timer() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = Arc::clone(&calls);
    let config = RetryConfig::builder()
        .max_retries(2)
        .initial_delay(Duration::from_millis(10))
        .max_delay(Duration::from_millis(50))
        .build()
        .expect("valid config");

    let start = Instant::now();
    let result = retry_with_policy(config, policies::AlwaysRetry, || {
        let calls = Arc::clone(&calls_clone);
        async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(TestError::transient("not yet"))
            } else {
                Ok(())
            }
        }
    })
    .await;

    assert!(result.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(start.elapsed() >= Duration::from_millis(30));
}
