//! Core data types for the test engine.

use serde::Serialize;
use std::time::Duration;

/// A raised error as the engine sees it: a runtime kind name plus an
/// optional textual message.
///
/// Test thunks raise `Thrown` values deliberately; exception matchers
/// inspect the kind and the message independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thrown {
    kind: String,
    message: Option<String>,
}

impl Thrown {
    /// Create a thrown error with a message.
    #[must_use]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: Some(message.into()),
        }
    }

    /// Create a thrown error without a message.
    #[must_use]
    pub fn bare(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: None,
        }
    }

    /// The runtime kind name.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The message, if one was attached.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The message as matchers see it: the attached text, or the literal
    /// string `"null"` when absent.
    ///
    /// A thrown error whose literal message is `"null"` is therefore
    /// indistinguishable from one with no message at all. Callers that need
    /// the distinction must use [`Thrown::message`] instead.
    #[must_use]
    pub fn message_text(&self) -> &str {
        self.message.as_deref().unwrap_or("null")
    }
}

impl std::fmt::Display for Thrown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}({:?})", self.kind, message),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// The classified result of running one test case.
///
/// Exactly one variant per run; created once, never mutated. Value fields
/// carry pre-formatted strings so outcomes stay comparable and serializable
/// regardless of the value type the test produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TestOutcome {
    /// The test met its expectation.
    Success,
    /// The computed value was not equal to the expected one.
    EqualityFailure {
        /// Formatted expected value.
        expected: String,
        /// Formatted actual value.
        actual: String,
    },
    /// The computed value did not satisfy the property.
    PropertyFailure {
        /// Formatted actual value.
        actual: String,
        /// Human-readable property statement.
        expectation: String,
    },
    /// An error was expected but the computation completed with a value.
    NoExceptionFailure {
        /// Formatted actual value.
        actual: String,
        /// What the matcher expected to be raised.
        expectation: String,
    },
    /// An error was raised but its kind was not accepted.
    WrongExceptionType {
        /// The error that was raised.
        thrown: Thrown,
        /// What the matcher expected to be raised.
        expectation: String,
    },
    /// An error of an accepted kind was raised with the wrong message.
    WrongExceptionMessage {
        /// The error that was raised.
        thrown: Thrown,
        /// What the matcher expected to be raised.
        expectation: String,
        /// Whether an exact message or a message predicate was violated.
        detail: String,
    },
    /// An error was raised with both an unaccepted kind and a wrong message.
    WrongExceptionTypeAndMessage {
        /// The error that was raised.
        thrown: Thrown,
        /// What the matcher expected to be raised.
        expectation: String,
    },
    /// Evaluation did not finish within the time budget.
    TimeoutFailure {
        /// The effective budget that expired.
        timeout: Duration,
        /// What the matcher expected.
        expectation: String,
    },
    /// The evaluation machinery itself failed (panicked thunk, cancelled
    /// wait), never a deliberate test error.
    UnexpectedError {
        /// The internal failure, surfaced as a thrown error.
        thrown: Thrown,
        /// What the matcher expected.
        expectation: String,
    },
}

impl TestOutcome {
    /// True iff the variant is [`TestOutcome::Success`].
    ///
    /// All aggregation (suite counts, rates, detail strings) goes through
    /// this single check.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Stable short label for the variant, used in reports.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::EqualityFailure { .. } => "equality failure",
            Self::PropertyFailure { .. } => "property failure",
            Self::NoExceptionFailure { .. } => "no exception raised",
            Self::WrongExceptionType { .. } => "wrong exception type",
            Self::WrongExceptionMessage { .. } => "wrong exception message",
            Self::WrongExceptionTypeAndMessage { .. } => "wrong exception type and message",
            Self::TimeoutFailure { .. } => "timeout",
            Self::UnexpectedError { .. } => "unexpected error",
        }
    }
}

/// Ambient settings shared read-only across a run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Time budget for tests without a per-test override.
    pub default_timeout: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(5),
        }
    }
}
