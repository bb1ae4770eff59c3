//! Rendering of outcomes and a progress-event reporter.
//!
//! Everything human-readable lives here: the engine itself never formats
//! text for display. Replacing this module (e.g. with a localized catalog
//! or a different sink) leaves evaluation and classification untouched.

use crate::runner::{ProgressEvent, RunSummary};
use crate::suite::SuiteResults;
use crate::types::TestOutcome;
use serde::Serialize;
use std::io::{self, Write};
use tokio::sync::mpsc;

/// One-line human description of a classified outcome.
#[must_use]
pub fn describe_outcome(outcome: &TestOutcome) -> String {
    match outcome {
        TestOutcome::Success => "ok".to_string(),
        TestOutcome::EqualityFailure { expected, actual } => {
            format!("expected {expected}, got {actual}")
        }
        TestOutcome::PropertyFailure {
            actual,
            expectation,
        } => format!("{expectation}, got {actual}"),
        TestOutcome::NoExceptionFailure {
            actual,
            expectation,
        } => format!("{expectation}, but completed with {actual}"),
        TestOutcome::WrongExceptionType { thrown, expectation } => {
            format!("{expectation}, but {thrown} was raised")
        }
        TestOutcome::WrongExceptionMessage {
            thrown,
            expectation,
            detail,
        } => format!("{expectation}, but {thrown} was raised: {detail}"),
        TestOutcome::WrongExceptionTypeAndMessage { thrown, expectation } => {
            format!("{expectation}, but {thrown} was raised (neither kind nor message match)")
        }
        TestOutcome::TimeoutFailure { timeout, expectation } => format!(
            "{expectation}, timed out after {:.1}s",
            timeout.as_secs_f64()
        ),
        TestOutcome::UnexpectedError { thrown, expectation } => {
            format!("unexpected error {thrown} while checking: {expectation}")
        }
    }
}

/// One-line suite summary: name, counts, rate, compact detail.
#[must_use]
pub fn format_suite_line(results: &SuiteResults) -> String {
    format!(
        "{}: {}/{} passed ({:.0}%) [{}]",
        results.suite(),
        results.passed(),
        results.total(),
        results.success_rate() * 100.0,
        results.detail()
    )
}

/// Full run report, serialized as JSON for machine consumers.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    /// ISO 8601 timestamp of report creation.
    pub timestamp: String,
    /// One snapshot per suite, in run order.
    pub suites: Vec<SuiteResults>,
    /// Cross-suite totals.
    pub summary: RunSummary,
}

impl ExecutionReport {
    /// Assemble a report, stamped with the current UTC time.
    #[must_use]
    pub fn new(suites: Vec<SuiteResults>, summary: RunSummary) -> Self {
        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default();
        Self {
            timestamp,
            suites,
            summary,
        }
    }
}

/// Serialize a report as pretty JSON.
#[must_use]
pub fn format_report_json(report: &ExecutionReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Reporter configuration.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Print test-started lines as well as results.
    pub verbose: bool,
    /// Use ANSI colors in output.
    pub color: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            color: true,
        }
    }
}

/// Progress-event sink with cargo test-like stdout output.
#[derive(Debug, Clone)]
pub struct Reporter {
    config: ReporterConfig,
}

impl Reporter {
    /// Create a reporter with the given configuration.
    #[must_use]
    pub const fn new(config: ReporterConfig) -> Self {
        Self { config }
    }

    /// Drain a progress channel until it closes, printing each event, then
    /// flush.
    pub async fn consume(&self, rx: &mut mpsc::UnboundedReceiver<ProgressEvent>) {
        while let Some(event) = rx.recv().await {
            self.event(&event);
        }
        self.flush();
    }

    /// Print one progress event.
    pub fn event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::RunStarted {
                suite_count,
                test_count,
            } => {
                println!("running {test_count} tests in {suite_count} suites");
            }
            ProgressEvent::SuiteStarted { suite, test_count } => {
                println!();
                println!("suite {suite}: {test_count} tests");
            }
            ProgressEvent::TestStarted { name } => {
                if self.config.verbose {
                    println!("test {name} ...");
                }
            }
            ProgressEvent::TestCompleted { name, outcome } => {
                println!("test {name} ... {}", self.status(outcome.is_success()));
                if !outcome.is_success() {
                    println!("    {}", describe_outcome(outcome));
                }
            }
            ProgressEvent::SuiteCompleted {
                suite,
                passed,
                failed,
            } => {
                println!("suite {suite}: {passed} passed; {failed} failed");
            }
            ProgressEvent::RunCompleted { summary } => {
                println!();
                println!(
                    "run result: {}. {} passed; {} failed across {} suites ({:.0}%)",
                    self.status(summary.failed == 0),
                    summary.passed,
                    summary.failed,
                    summary.total_suites,
                    summary.success_rate * 100.0
                );
            }
        }
    }

    const fn status(&self, ok: bool) -> &'static str {
        if ok {
            if self.config.color {
                "\x1b[32mok\x1b[0m"
            } else {
                "ok"
            }
        } else if self.config.color {
            "\x1b[31mFAILED\x1b[0m"
        } else {
            "FAILED"
        }
    }

    /// Flush stdout.
    pub fn flush(&self) {
        let _ = io::stdout().flush();
    }
}
