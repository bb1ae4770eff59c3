//! A named, re-runnable test case binding a thunk to a matcher.

use crate::eval::{self, Thunk};
use crate::matcher::{Classify, EqualityMatcher, ExceptionMatcher, PropertyMatcher};
use crate::runner::{ProgressEvent, ProgressSender};
use crate::types::{RunConfig, TestOutcome, Thrown};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

type ExecFn = Arc<dyn Fn(Duration) -> BoxFuture<'static, TestOutcome> + Send + Sync>;

/// One executable test: a name, an optional timeout override, and a
/// captured thunk-plus-matcher pair.
///
/// Immutable once constructed and re-runnable: every [`TestCase::run`]
/// re-invokes the thunk from scratch.
#[derive(Clone)]
pub struct TestCase {
    name: String,
    timeout_override: Option<Duration>,
    exec: ExecFn,
}

impl Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("timeout_override", &self.timeout_override)
            .finish_non_exhaustive()
    }
}

impl TestCase {
    /// Erase the value type at construction time: the closure owns the
    /// typed thunk and matcher and yields classified outcomes only.
    fn bind<T, M>(
        name: impl Into<String>,
        thunk: impl Fn() -> Result<T, Thrown> + Send + Sync + 'static,
        matcher: M,
    ) -> Self
    where
        T: Send + 'static,
        M: Classify<T> + 'static,
    {
        let thunk: Thunk<T> = Arc::new(thunk);
        let matcher = Arc::new(matcher);
        let exec: ExecFn = Arc::new(move |timeout| {
            let thunk = Arc::clone(&thunk);
            let matcher = Arc::clone(&matcher);
            async move {
                match eval::evaluate(&thunk, timeout).await {
                    Ok(raw) => matcher.classify(raw, timeout),
                    Err(error) => TestOutcome::UnexpectedError {
                        thrown: error.into_thrown(),
                        expectation: matcher.expectation(),
                    },
                }
            }
            .boxed()
        });
        Self {
            name: name.into(),
            timeout_override: None,
            exec,
        }
    }

    /// Test that the computed value equals `expected` (via `PartialEq`).
    pub fn equal<T>(
        name: impl Into<String>,
        thunk: impl Fn() -> Result<T, Thrown> + Send + Sync + 'static,
        expected: T,
    ) -> Self
    where
        T: PartialEq + Debug + Send + Sync + 'static,
    {
        Self::bind(name, thunk, EqualityMatcher::new(expected))
    }

    /// Test equality with a custom comparator.
    pub fn equal_by<T>(
        name: impl Into<String>,
        thunk: impl Fn() -> Result<T, Thrown> + Send + Sync + 'static,
        expected: T,
        equals: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
    ) -> Self
    where
        T: Debug + Send + Sync + 'static,
    {
        Self::bind(name, thunk, EqualityMatcher::by(expected, equals))
    }

    /// Test equality with a pre-built matcher (custom format and all).
    pub fn equality<T>(
        name: impl Into<String>,
        thunk: impl Fn() -> Result<T, Thrown> + Send + Sync + 'static,
        matcher: EqualityMatcher<T>,
    ) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self::bind(name, thunk, matcher)
    }

    /// Test that the computed value satisfies a named property.
    pub fn satisfies<T>(
        name: impl Into<String>,
        thunk: impl Fn() -> Result<T, Thrown> + Send + Sync + 'static,
        description: impl Into<String>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self
    where
        T: Debug + Send + Sync + 'static,
    {
        Self::bind(name, thunk, PropertyMatcher::new(description, predicate))
    }

    /// Test a property with a pre-built matcher.
    pub fn satisfying<T>(
        name: impl Into<String>,
        thunk: impl Fn() -> Result<T, Thrown> + Send + Sync + 'static,
        matcher: PropertyMatcher<T>,
    ) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self::bind(name, thunk, matcher)
    }

    /// Test that the computed boolean holds.
    pub fn asserting(
        name: impl Into<String>,
        thunk: impl Fn() -> Result<bool, Thrown> + Send + Sync + 'static,
    ) -> Self {
        Self::bind(name, thunk, PropertyMatcher::asserted())
    }

    /// Test that the computed boolean does not hold.
    pub fn refuting(
        name: impl Into<String>,
        thunk: impl Fn() -> Result<bool, Thrown> + Send + Sync + 'static,
    ) -> Self {
        Self::bind(name, thunk, PropertyMatcher::refuted())
    }

    /// Test that the thunk raises an error accepted by `matcher`.
    pub fn raises<T>(
        name: impl Into<String>,
        thunk: impl Fn() -> Result<T, Thrown> + Send + Sync + 'static,
        matcher: ExceptionMatcher,
    ) -> Self
    where
        T: Debug + Send + Sync + 'static,
    {
        Self::bind(name, thunk, matcher)
    }

    /// Override the ambient default timeout for this test only.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_override = Some(timeout);
        self
    }

    /// The test's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the test once and classify the result.
    ///
    /// Never panics and never returns an error: every failure mode,
    /// including timeouts and engine-internal failures, comes back as a
    /// [`TestOutcome`] value. Progress events are observational only and
    /// cannot affect the outcome.
    pub async fn run(&self, config: &RunConfig, progress: Option<&ProgressSender>) -> TestOutcome {
        let timeout = self.timeout_override.unwrap_or(config.default_timeout);
        if let Some(tx) = progress {
            let _ = tx.send(ProgressEvent::TestStarted {
                name: self.name.clone(),
            });
        }
        let outcome = (self.exec)(timeout).await;
        if let Some(tx) = progress {
            let _ = tx.send(ProgressEvent::TestCompleted {
                name: self.name.clone(),
                outcome: outcome.clone(),
            });
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn config() -> RunConfig {
        RunConfig::default()
    }

    #[tokio::test]
    async fn test_sum_matches_expected() {
        let test = TestCase::equal("sum", || Ok(2 + 3), 5);
        let outcome = test.run(&config(), None).await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_sum_mismatch_reports_both_values() {
        let test = TestCase::equal("sum", || Ok(2 + 3), 6);
        let outcome = test.run(&config(), None).await;
        assert_eq!(
            outcome,
            TestOutcome::EqualityFailure {
                expected: "6".to_string(),
                actual: "5".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_expected_exception_raised() {
        let test = TestCase::raises(
            "rejects bad input",
            || -> Result<i32, Thrown> { Err(Thrown::new("IllegalArgument", "bad")) },
            ExceptionMatcher::of("IllegalArgument"),
        );
        let outcome = test.run(&config(), None).await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_wrong_exception_kind() {
        let test = TestCase::raises(
            "rejects bad input",
            || -> Result<i32, Thrown> { Err(Thrown::new("Runtime", "bad")) },
            ExceptionMatcher::of("IllegalArgument"),
        );
        let outcome = test.run(&config(), None).await;
        assert!(matches!(outcome, TestOutcome::WrongExceptionType { .. }));
    }

    #[tokio::test]
    async fn test_wrong_exception_message() {
        let test = TestCase::raises(
            "message checked",
            || -> Result<i32, Thrown> { Err(Thrown::new("IllegalArgument", "Y")) },
            ExceptionMatcher::of("IllegalArgument").with_message("X"),
        );
        let outcome = test.run(&config(), None).await;
        assert!(matches!(outcome, TestOutcome::WrongExceptionMessage { .. }));
    }

    #[tokio::test]
    async fn test_timeout_override_applies() {
        let test = TestCase::equal(
            "slow",
            || {
                std::thread::sleep(Duration::from_millis(200));
                Ok(1)
            },
            1,
        )
        .with_timeout(Duration::from_millis(10));
        let outcome = test.run(&config(), None).await;
        assert!(matches!(
            outcome,
            TestOutcome::TimeoutFailure { timeout, .. } if timeout == Duration::from_millis(10)
        ));
    }

    #[tokio::test]
    #[allow(clippy::panic)]
    async fn test_panicking_thunk_becomes_unexpected_error() {
        let test = TestCase::asserting("explosive", || panic!("boom"));
        let outcome = test.run(&config(), None).await;
        assert!(matches!(
            outcome,
            TestOutcome::UnexpectedError { ref thrown, .. } if thrown.kind() == "panic"
        ));
    }

    #[tokio::test]
    async fn test_rerun_reinvokes_thunk() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let test = TestCase::asserting("counted", move || {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        });
        let cfg = config();
        test.run(&cfg, None).await;
        test.run(&cfg, None).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_progress_events_bracket_the_run() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let test = TestCase::equal("sum", || Ok(2 + 3), 5);
        let outcome = test.run(&config(), Some(&tx)).await;
        drop(tx);

        let first = rx.try_recv().ok();
        assert!(matches!(
            first,
            Some(ProgressEvent::TestStarted { ref name }) if name == "sum"
        ));
        let second = rx.try_recv().ok();
        assert!(matches!(
            second,
            Some(ProgressEvent::TestCompleted { ref name, outcome: ref seen })
                if name == "sum" && *seen == outcome
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_refuting_and_equal_by() {
        let refute = TestCase::refuting("not empty", || Ok("abc".is_empty()));
        assert!(refute.run(&config(), None).await.is_success());

        let close = TestCase::equal_by(
            "approximately pi",
            || Ok(3.141_5_f64),
            std::f64::consts::PI,
            |a, b| (a - b).abs() < 1e-3,
        );
        assert!(close.run(&config(), None).await.is_success());
    }
}
