//! Ordered suites of test cases and their aggregated results.

use crate::case::TestCase;
use crate::runner::{ProgressEvent, ProgressSender};
use crate::types::{RunConfig, TestOutcome};
use serde::Serialize;

/// A named, ordered collection of test cases. Immutable; tests run strictly
/// in declaration order, one at a time.
#[derive(Debug, Clone)]
pub struct Suite {
    name: String,
    tests: Vec<TestCase>,
}

impl Suite {
    /// Create a suite from tests in declaration order.
    #[must_use]
    pub fn new(name: impl Into<String>, tests: Vec<TestCase>) -> Self {
        Self {
            name: name.into(),
            tests,
        }
    }

    /// The suite's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of tests in the suite.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// True when the suite holds no tests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Run every test sequentially, in declaration order, and snapshot the
    /// outcomes.
    pub async fn run(
        &self,
        config: &RunConfig,
        progress: Option<&ProgressSender>,
    ) -> SuiteResults {
        if let Some(tx) = progress {
            let _ = tx.send(ProgressEvent::SuiteStarted {
                suite: self.name.clone(),
                test_count: self.tests.len(),
            });
        }

        let mut records = Vec::with_capacity(self.tests.len());
        for test in &self.tests {
            let outcome = test.run(config, progress).await;
            records.push(TestRecord {
                name: test.name().to_string(),
                outcome,
            });
        }

        let results = SuiteResults {
            suite: self.name.clone(),
            records,
        };
        if let Some(tx) = progress {
            let _ = tx.send(ProgressEvent::SuiteCompleted {
                suite: self.name.clone(),
                passed: results.passed(),
                failed: results.failed(),
            });
        }
        results
    }
}

/// One test's name and classified outcome, in suite order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRecord {
    /// The test's name.
    pub name: String,
    /// The classified outcome.
    pub outcome: TestOutcome,
}

/// Snapshot of one suite run. Equality is structural and order-sensitive
/// over the underlying records; every query recomputes from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteResults {
    suite: String,
    records: Vec<TestRecord>,
}

impl SuiteResults {
    /// Name of the suite that produced this snapshot.
    #[must_use]
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Records in declaration order.
    #[must_use]
    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    /// Total number of tests.
    #[must_use]
    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// Number of successful tests.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.outcome.is_success())
            .count()
    }

    /// Number of failed tests.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Fraction of passed tests; an empty suite is vacuously fully
    /// successful (1.0).
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.records.is_empty() {
            1.0
        } else {
            ratio(self.passed(), self.total())
        }
    }

    /// Compact per-test detail: one `+` or `-` per test, in order.
    #[must_use]
    pub fn detail(&self) -> String {
        self.records
            .iter()
            .map(|record| if record.outcome.is_success() { '+' } else { '-' })
            .collect()
    }
}

/// `part / whole`, saturating counts at `u32::MAX` before the float
/// conversion so precision lints stay quiet for realistic sizes.
pub(crate) fn ratio(part: usize, whole: usize) -> f64 {
    let part = f64::from(u32::try_from(part).unwrap_or(u32::MAX));
    let whole = f64::from(u32::try_from(whole).unwrap_or(u32::MAX));
    part / whole
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_test_suite() -> Suite {
        Suite::new(
            "arithmetic",
            vec![
                TestCase::equal("sum", || Ok(2 + 3), 5),
                TestCase::equal("product", || Ok(2 * 3), 6),
                TestCase::equal("difference", || Ok(2 - 3), 0),
            ],
        )
    }

    #[tokio::test]
    async fn test_counts_and_detail_in_declaration_order() {
        let results = three_test_suite().run(&RunConfig::default(), None).await;
        assert_eq!(results.total(), 3);
        assert_eq!(results.passed(), 2);
        assert_eq!(results.failed(), 1);
        assert_eq!(results.detail(), "++-");
    }

    #[tokio::test]
    async fn test_passed_plus_failed_equals_total() {
        let results = three_test_suite().run(&RunConfig::default(), None).await;
        assert_eq!(results.passed() + results.failed(), results.total());
    }

    #[tokio::test]
    async fn test_record_order_matches_declaration() {
        let results = three_test_suite().run(&RunConfig::default(), None).await;
        let names: Vec<&str> = results.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["sum", "product", "difference"]);
    }

    #[tokio::test]
    async fn test_empty_suite_is_vacuously_successful() {
        let suite = Suite::new("empty", vec![]);
        let results = suite.run(&RunConfig::default(), None).await;
        assert_eq!(results.total(), 0);
        assert!((results.success_rate() - 1.0).abs() < f64::EPSILON);
        assert_eq!(results.detail(), "");
    }

    #[tokio::test]
    async fn test_success_rate_is_passed_over_total() {
        let results = three_test_suite().run(&RunConfig::default(), None).await;
        assert!((results.success_rate() - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_rerun_yields_structurally_equal_results() {
        let suite = three_test_suite();
        let config = RunConfig::default();
        let first = suite.run(&config, None).await;
        let second = suite.run(&config, None).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_detail_length_matches_total() {
        let results = three_test_suite().run(&RunConfig::default(), None).await;
        assert_eq!(results.detail().len(), results.total());
        assert!(results.detail().chars().all(|c| c == '+' || c == '-'));
    }
}
