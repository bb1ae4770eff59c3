//! Bounded, cancellable unit-test execution engine.
//!
//! Tests are plain values: a [`TestCase`] pairs a fallible thunk with a
//! matcher (equality, named property, or expected exception), a [`Suite`]
//! holds cases in declaration order, and [`run_all`] executes suites
//! sequentially under a wall-clock timeout. Every run produces a classified
//! [`TestOutcome`]; the engine itself never panics and never prints.
//!
//! ```no_run
//! use attest::{ExceptionMatcher, RunConfig, Suite, TestCase, Thrown, run_all};
//!
//! # async fn demo() {
//! let suites = vec![Suite::new(
//!     "arithmetic",
//!     vec![
//!         TestCase::equal("sum", || Ok(2 + 3), 5),
//!         TestCase::raises(
//!             "rejects zero divisor",
//!             || -> Result<i32, Thrown> { Err(Thrown::new("Arithmetic", "divide by zero")) },
//!             ExceptionMatcher::of("Arithmetic"),
//!         ),
//!     ],
//! )];
//! let (results, summary) = run_all(&suites, &RunConfig::default(), None).await;
//! assert_eq!(summary.passed, 2);
//! # let _ = results;
//! # }
//! ```

pub mod case;
pub mod eval;
pub mod matcher;
pub mod report;
pub mod runner;
pub mod suite;
pub mod types;

pub use case::TestCase;
pub use eval::{EvalError, Thunk};
pub use matcher::{EqualityMatcher, ExceptionMatcher, MatcherError, PropertyMatcher};
pub use report::{
    ExecutionReport, Reporter, ReporterConfig, describe_outcome, format_report_json,
    format_suite_line,
};
pub use runner::{ProgressEvent, ProgressSender, RunSummary, run_all};
pub use suite::{Suite, SuiteResults, TestRecord};
pub use types::{RunConfig, TestOutcome, Thrown};
