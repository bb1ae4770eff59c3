//! Sequential execution of multiple suites with a cross-suite summary.

use crate::suite::{Suite, SuiteResults, ratio};
use crate::types::{RunConfig, TestOutcome};
use serde::Serialize;
use tokio::sync::mpsc;

/// Progress events emitted while tests execute. Observational only: sinks
/// own rendering, coloring, and localization.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A multi-suite run is starting.
    RunStarted {
        suite_count: usize,
        test_count: usize,
    },
    /// A suite is starting.
    SuiteStarted { suite: String, test_count: usize },
    /// An individual test is about to be evaluated.
    TestStarted { name: String },
    /// An individual test finished with a classified outcome.
    TestCompleted { name: String, outcome: TestOutcome },
    /// A suite finished.
    SuiteCompleted {
        suite: String,
        passed: usize,
        failed: usize,
    },
    /// The whole run finished.
    RunCompleted { summary: RunSummary },
}

/// Sender for progress events.
pub type ProgressSender = mpsc::UnboundedSender<ProgressEvent>;

/// Cross-suite totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_suites: usize,
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    /// `passed / total_tests`; 1.0 when no tests ran anywhere.
    pub success_rate: f64,
}

impl RunSummary {
    /// Aggregate suite snapshots into run totals.
    #[must_use]
    pub fn from_results(results: &[SuiteResults]) -> Self {
        let total_tests: usize = results.iter().map(SuiteResults::total).sum();
        let passed: usize = results.iter().map(SuiteResults::passed).sum();
        let failed = total_tests - passed;
        let success_rate = if total_tests == 0 {
            1.0
        } else {
            ratio(passed, total_tests)
        };
        Self {
            total_suites: results.len(),
            total_tests,
            passed,
            failed,
            success_rate,
        }
    }
}

/// Run every suite sequentially, in input order, and summarize across them.
///
/// Returns one [`SuiteResults`] per suite, in the same order, plus the
/// cross-suite [`RunSummary`].
pub async fn run_all(
    suites: &[Suite],
    config: &RunConfig,
    progress: Option<&ProgressSender>,
) -> (Vec<SuiteResults>, RunSummary) {
    if let Some(tx) = progress {
        let _ = tx.send(ProgressEvent::RunStarted {
            suite_count: suites.len(),
            test_count: suites.iter().map(Suite::len).sum(),
        });
    }

    let mut results = Vec::with_capacity(suites.len());
    for suite in suites {
        results.push(suite.run(config, progress).await);
    }

    let summary = RunSummary::from_results(&results);
    if let Some(tx) = progress {
        let _ = tx.send(ProgressEvent::RunCompleted {
            summary: summary.clone(),
        });
    }
    (results, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::TestCase;

    fn suites() -> Vec<Suite> {
        vec![
            Suite::new(
                "arithmetic",
                vec![
                    TestCase::equal("sum", || Ok(2 + 3), 5),
                    TestCase::equal("bad sum", || Ok(2 + 3), 6),
                ],
            ),
            Suite::new(
                "strings",
                vec![TestCase::asserting("not empty", || Ok(!"abc".is_empty()))],
            ),
        ]
    }

    #[tokio::test]
    async fn test_results_preserve_suite_order() {
        let (results, _) = run_all(&suites(), &RunConfig::default(), None).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].suite(), "arithmetic");
        assert_eq!(results[1].suite(), "strings");
    }

    #[tokio::test]
    async fn test_summary_totals() {
        let (_, summary) = run_all(&suites(), &RunConfig::default(), None).await;
        assert_eq!(summary.total_suites, 2);
        assert_eq!(summary.total_tests, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert!((summary.success_rate - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_zero_tests_is_fully_successful() {
        let (_, summary) = run_all(&[], &RunConfig::default(), None).await;
        assert_eq!(summary.total_tests, 0);
        assert!((summary.success_rate - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_progress_event_order_for_sequential_run() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let single = vec![Suite::new(
            "only",
            vec![TestCase::equal("sum", || Ok(1 + 1), 2)],
        )];
        run_all(&single, &RunConfig::default(), Some(&tx)).await;
        drop(tx);

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(match event {
                ProgressEvent::RunStarted { .. } => "run_started",
                ProgressEvent::SuiteStarted { .. } => "suite_started",
                ProgressEvent::TestStarted { .. } => "test_started",
                ProgressEvent::TestCompleted { .. } => "test_completed",
                ProgressEvent::SuiteCompleted { .. } => "suite_completed",
                ProgressEvent::RunCompleted { .. } => "run_completed",
            });
        }
        assert_eq!(
            kinds,
            vec![
                "run_started",
                "suite_started",
                "test_started",
                "test_completed",
                "suite_completed",
                "run_completed",
            ]
        );
    }

    #[tokio::test]
    async fn test_run_completed_carries_summary() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_, summary) = run_all(&suites(), &RunConfig::default(), Some(&tx)).await;
        drop(tx);

        let mut completed = None;
        while let Ok(event) = rx.try_recv() {
            if let ProgressEvent::RunCompleted { summary } = event {
                completed = Some(summary);
            }
        }
        assert_eq!(completed, Some(summary));
    }
}
