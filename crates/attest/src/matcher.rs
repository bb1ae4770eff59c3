//! Outcome classification: equality, property, and exception matchers.
//!
//! Matchers are pure: they take the raw evaluation outcome and return a
//! classified [`TestOutcome`]. The original class hierarchy this models
//! (assert/refute as property subclasses, one-of/except as exception
//! subclasses) is flattened into structs parameterized by closures.

use crate::eval::RawOutcome;
use crate::types::{TestOutcome, Thrown};
use regex::Regex;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Preconditions rejected at matcher construction time, before any run.
#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("exception matcher requires at least one accepted kind")]
    EmptyKindSet,
}

type Equals<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;
type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
type Format<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
type ThrownPredicate = Arc<dyn Fn(&Thrown) -> bool + Send + Sync>;
type MessagePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Classification seam between the evaluator's raw outcome and the public
/// outcome taxonomy. One implementation per matcher family.
pub(crate) trait Classify<T>: Send + Sync {
    /// Map a raw evaluation outcome to its classified test outcome.
    fn classify(&self, raw: RawOutcome<T>, timeout: Duration) -> TestOutcome;

    /// Human-readable statement of what this matcher expects.
    fn expectation(&self) -> String;
}

/// Matches a completed value against an expected one.
pub struct EqualityMatcher<T> {
    expected: T,
    equals: Equals<T>,
    format: Format<T>,
}

impl<T: PartialEq + Debug + Send + Sync + 'static> EqualityMatcher<T> {
    /// Matcher using `PartialEq` and the `Debug` rendering.
    #[must_use]
    pub fn new(expected: T) -> Self {
        Self {
            expected,
            equals: Arc::new(|a, b| a == b),
            format: Arc::new(|value| format!("{value:?}")),
        }
    }
}

impl<T: Debug + Send + Sync + 'static> EqualityMatcher<T> {
    /// Matcher with a custom comparator, for types where `PartialEq` is
    /// absent or too strict.
    #[must_use]
    pub fn by(expected: T, equals: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            expected,
            equals: Arc::new(equals),
            format: Arc::new(|value| format!("{value:?}")),
        }
    }
}

impl<T> EqualityMatcher<T> {
    /// Replace the value rendering used in failure outcomes.
    #[must_use]
    pub fn with_format(mut self, format: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.format = Arc::new(format);
        self
    }
}

impl<T: Send + Sync> Classify<T> for EqualityMatcher<T> {
    fn classify(&self, raw: RawOutcome<T>, timeout: Duration) -> TestOutcome {
        match raw {
            RawOutcome::Completed(value) => {
                if (self.equals)(&value, &self.expected) {
                    TestOutcome::Success
                } else {
                    TestOutcome::EqualityFailure {
                        expected: (self.format)(&self.expected),
                        actual: (self.format)(&value),
                    }
                }
            }
            // Value tests never expect an error; any raised error is
            // unexpected by definition.
            RawOutcome::Raised(thrown) => TestOutcome::UnexpectedError {
                thrown,
                expectation: self.expectation(),
            },
            RawOutcome::TimedOut => TestOutcome::TimeoutFailure {
                timeout,
                expectation: self.expectation(),
            },
        }
    }

    fn expectation(&self) -> String {
        format!("expected == {}", (self.format)(&self.expected))
    }
}

/// Matches a completed value against a predicate.
pub struct PropertyMatcher<T> {
    predicate: Predicate<T>,
    format: Format<T>,
    description: String,
}

impl<T: Debug + Send + Sync + 'static> PropertyMatcher<T> {
    /// Matcher for a named property with the `Debug` rendering.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            predicate: Arc::new(predicate),
            format: Arc::new(|value| format!("{value:?}")),
            description: description.into(),
        }
    }
}

impl<T> PropertyMatcher<T> {
    /// Replace the value rendering used in failure outcomes.
    #[must_use]
    pub fn with_format(mut self, format: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.format = Arc::new(format);
        self
    }
}

impl PropertyMatcher<bool> {
    /// The identity property: the computed boolean must hold.
    #[must_use]
    pub fn asserted() -> Self {
        Self::new("expected to hold", |value| *value)
    }

    /// The negated property: the computed boolean must not hold.
    #[must_use]
    pub fn refuted() -> Self {
        Self::new("expected not to hold", |value| !*value)
    }
}

impl<T: Send + Sync> Classify<T> for PropertyMatcher<T> {
    fn classify(&self, raw: RawOutcome<T>, timeout: Duration) -> TestOutcome {
        match raw {
            RawOutcome::Completed(value) => {
                if (self.predicate)(&value) {
                    TestOutcome::Success
                } else {
                    TestOutcome::PropertyFailure {
                        actual: (self.format)(&value),
                        expectation: self.description.clone(),
                    }
                }
            }
            RawOutcome::Raised(thrown) => TestOutcome::UnexpectedError {
                thrown,
                expectation: self.expectation(),
            },
            RawOutcome::TimedOut => TestOutcome::TimeoutFailure {
                timeout,
                expectation: self.expectation(),
            },
        }
    }

    fn expectation(&self) -> String {
        self.description.clone()
    }
}

/// Matches a raised error on two independent axes: kind acceptance and
/// message acceptance.
pub struct ExceptionMatcher {
    type_accepted: ThrownPredicate,
    expected_message: Option<String>,
    message_predicate: MessagePredicate,
    message_hint: Option<String>,
    type_expectation: String,
}

impl ExceptionMatcher {
    /// Accept errors whose kind is in the given non-empty set.
    ///
    /// # Errors
    /// Returns [`MatcherError::EmptyKindSet`] for an empty set; an exception
    /// matcher that accepts nothing can never succeed and is rejected
    /// before any test can run.
    pub fn one_of(kinds: &[&str]) -> Result<Self, MatcherError> {
        if kinds.is_empty() {
            return Err(MatcherError::EmptyKindSet);
        }
        let accepted: Vec<String> = kinds.iter().map(ToString::to_string).collect();
        let type_expectation = format!("expected raise of one of [{}]", accepted.join(", "));
        Ok(Self::by_parts(
            Arc::new(move |thrown| accepted.iter().any(|kind| kind == thrown.kind())),
            type_expectation,
        ))
    }

    /// Accept errors of exactly one kind.
    #[must_use]
    pub fn of(kind: &str) -> Self {
        let accepted = kind.to_string();
        let type_expectation = format!("expected raise of {accepted}");
        Self::by_parts(
            Arc::new(move |thrown| thrown.kind() == accepted),
            type_expectation,
        )
    }

    /// Accept errors of any kind except the given one.
    #[must_use]
    pub fn except(kind: &str) -> Self {
        let excluded = kind.to_string();
        let type_expectation = format!("expected raise of anything but {excluded}");
        Self::by_parts(
            Arc::new(move |thrown| thrown.kind() != excluded),
            type_expectation,
        )
    }

    /// Fully custom kind acceptance with its own description.
    #[must_use]
    pub fn by(
        description: impl Into<String>,
        type_accepted: impl Fn(&Thrown) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::by_parts(Arc::new(type_accepted), description.into())
    }

    fn by_parts(type_accepted: ThrownPredicate, type_expectation: String) -> Self {
        Self {
            type_accepted,
            expected_message: None,
            message_predicate: Arc::new(|_| true),
            message_hint: None,
            type_expectation,
        }
    }

    /// Require the exact message. Takes priority over any message predicate.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.expected_message = Some(message.into());
        self
    }

    /// Require the message to satisfy a predicate, with a hint used in
    /// descriptions. Ignored when an exact message is set.
    #[must_use]
    pub fn with_message_predicate(
        mut self,
        hint: impl Into<String>,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.message_predicate = Arc::new(predicate);
        self.message_hint = Some(hint.into());
        self
    }

    /// Require the message to match a regex.
    #[must_use]
    pub fn with_message_matching(self, pattern: &Regex) -> Self {
        let regex = pattern.clone();
        let hint = format!("message matching /{regex}/");
        self.with_message_predicate(hint, move |message| regex.is_match(message))
    }

    fn message_ok(&self, thrown: &Thrown) -> bool {
        self.expected_message.as_deref().map_or_else(
            || (self.message_predicate)(thrown.message_text()),
            |expected| thrown.message_text() == expected,
        )
    }

    fn message_detail(&self, thrown: &Thrown) -> String {
        self.expected_message.as_deref().map_or_else(
            || match &self.message_hint {
                Some(hint) => format!(
                    "message {:?} does not satisfy {hint}",
                    thrown.message_text()
                ),
                None => format!("message {:?} rejected by message predicate", thrown.message_text()),
            },
            |expected| format!("expected message {:?}, got {:?}", expected, thrown.message_text()),
        )
    }
}

impl<T: Debug + Send + Sync> Classify<T> for ExceptionMatcher {
    /// Classify by checking kind and message independently.
    ///
    /// # Truth table
    /// | `type_ok` | `msg_ok` | outcome |
    /// |-----------|----------|---------|
    /// | true      | true     | `Success` |
    /// | false     | true     | `WrongExceptionType` |
    /// | true      | false    | `WrongExceptionMessage` |
    /// | false     | false    | `WrongExceptionTypeAndMessage` |
    ///
    /// Reporting the two axes separately tells the user which expectation
    /// failed without re-running the test.
    fn classify(&self, raw: RawOutcome<T>, timeout: Duration) -> TestOutcome {
        match raw {
            // An error was expected; completing with any value is a failure.
            RawOutcome::Completed(value) => TestOutcome::NoExceptionFailure {
                actual: format!("{value:?}"),
                expectation: <Self as Classify<T>>::expectation(self),
            },
            RawOutcome::Raised(thrown) => {
                let type_ok = (self.type_accepted)(&thrown);
                let msg_ok = self.message_ok(&thrown);
                match (type_ok, msg_ok) {
                    (true, true) => TestOutcome::Success,
                    (false, true) => TestOutcome::WrongExceptionType {
                        thrown,
                        expectation: <Self as Classify<T>>::expectation(self),
                    },
                    (true, false) => {
                        let detail = self.message_detail(&thrown);
                        TestOutcome::WrongExceptionMessage {
                            thrown,
                            expectation: <Self as Classify<T>>::expectation(self),
                            detail,
                        }
                    }
                    (false, false) => TestOutcome::WrongExceptionTypeAndMessage {
                        thrown,
                        expectation: <Self as Classify<T>>::expectation(self),
                    },
                }
            }
            RawOutcome::TimedOut => TestOutcome::TimeoutFailure {
                timeout,
                expectation: <Self as Classify<T>>::expectation(self),
            },
        }
    }

    fn expectation(&self) -> String {
        if let Some(message) = &self.expected_message {
            format!("{} with message {message:?}", self.type_expectation)
        } else if let Some(hint) = &self.message_hint {
            format!("{} with {hint}", self.type_expectation)
        } else {
            self.type_expectation.clone()
        }
    }
}
