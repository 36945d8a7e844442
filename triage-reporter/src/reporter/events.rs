// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{errors::EventParseError, location::SourceLocation};
use serde::{Deserialize, Deserializer, de};
use std::time::Duration;

/// A lifecycle event delivered by the test engine.
///
/// Events are expected in the order `RunStarted`, then any number of
/// `SuiteStarted`/`TestFinished`*/`SuiteFinished` groups, then `RunFinished`. The reporter does
/// not validate this order.
///
/// The JSON-lines wire form is an object tagged by `event`, for example
/// `{"event":"suite-started","suite":"parser"}`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ReporterEvent {
    /// The test run started.
    RunStarted,

    /// A suite started executing.
    SuiteStarted {
        /// The name of the suite.
        suite: String,
    },

    /// A test finished executing.
    TestFinished {
        /// The result of the test.
        result: TestResult,
    },

    /// A suite finished executing.
    SuiteFinished {
        /// The name of the suite.
        suite: String,
    },

    /// The test run finished, and the final report should be produced.
    RunFinished,
}

impl ReporterEvent {
    /// Decodes one line of a JSON-lines event stream.
    ///
    /// `line_number` is 1-based and only used for error reporting. Returns `Ok(None)` for blank
    /// lines.
    pub fn from_json_line(line: &str, line_number: usize) -> Result<Option<Self>, EventParseError> {
        if line.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(line)
            .map(Some)
            .map_err(|error| EventParseError::new(line_number, error))
    }
}

/// The result of one executed test, as delivered by the test engine.
///
/// Outcomes are reported as flags here. The reporter classifies each result into exactly one
/// [`TestOutcome`](super::TestOutcome) when it is recorded.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TestResult {
    /// The suite (or class, or module) the test belongs to.
    pub suite: String,

    /// The name of the test.
    pub name: String,

    /// True if the test passed.
    #[serde(default)]
    pub passed: bool,

    /// True if the test was skipped.
    #[serde(default)]
    pub skipped: bool,

    /// True if the test raised an unexpected error, as opposed to failing an assertion.
    #[serde(default)]
    pub error: bool,

    /// How long the test took. Encoded as a number of seconds.
    #[serde(deserialize_with = "deserialize_duration")]
    pub duration: Duration,

    /// The number of assertions the test made.
    #[serde(default)]
    pub assertions: u64,

    /// Where the test is defined.
    pub location: SourceLocation,

    /// Details about the failure, error, or skip.
    #[serde(default)]
    pub failure: Option<FailureDetail>,
}

impl TestResult {
    /// Creates a result for a passing test.
    pub fn passed(
        suite: impl Into<String>,
        name: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            passed: true,
            ..Self::unset(suite, name, location)
        }
    }

    /// Creates a result for a skipped test, with an optional reason.
    pub fn skipped(
        suite: impl Into<String>,
        name: impl Into<String>,
        location: SourceLocation,
        detail: Option<FailureDetail>,
    ) -> Self {
        Self {
            skipped: true,
            failure: detail,
            ..Self::unset(suite, name, location)
        }
    }

    /// Creates a result for a test that raised an unexpected error.
    pub fn errored(
        suite: impl Into<String>,
        name: impl Into<String>,
        location: SourceLocation,
        detail: FailureDetail,
    ) -> Self {
        Self {
            error: true,
            failure: Some(detail),
            ..Self::unset(suite, name, location)
        }
    }

    /// Creates a result for a test that failed an assertion.
    pub fn failed(
        suite: impl Into<String>,
        name: impl Into<String>,
        location: SourceLocation,
        detail: FailureDetail,
    ) -> Self {
        Self {
            failure: Some(detail),
            ..Self::unset(suite, name, location)
        }
    }

    /// Sets the duration of the test.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the number of assertions made by the test.
    pub fn with_assertions(mut self, assertions: u64) -> Self {
        self.assertions = assertions;
        self
    }

    /// A result with no outcome information at all.
    pub(crate) fn unset(
        suite: impl Into<String>,
        name: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            suite: suite.into(),
            name: name.into(),
            passed: false,
            skipped: false,
            error: false,
            duration: Duration::ZERO,
            assertions: 0,
            location,
            failure: None,
        }
    }
}

/// Why a test did not pass.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct FailureDetail {
    /// The name of the exception or assertion type.
    pub exception: String,

    /// The failure message. May be empty.
    #[serde(default)]
    pub message: String,

    /// Where the failure was triggered. This is often different from where the test is defined.
    pub location: SourceLocation,
}

impl FailureDetail {
    /// Creates a new failure detail.
    pub fn new(
        exception: impl Into<String>,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            exception: exception.into(),
            message: message.into(),
            location,
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(|_| {
        de::Error::invalid_value(
            de::Unexpected::Float(secs),
            &"a non-negative, finite number of seconds",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn decode_event_stream() {
        let input = indoc! {r#"
            {"event":"run-started"}
            {"event":"suite-started","suite":"parser"}

            {"event":"test-finished","result":{"suite":"parser","name":"parses_empty","passed":true,"duration":0.25,"assertions":3,"location":{"path":"/work/app/test/parser_test.rs","line":10}}}
            {"event":"test-finished","result":{"suite":"parser","name":"parses_nested","duration":1.5,"location":{"path":"/work/app/test/parser_test.rs","line":20},"failure":{"exception":"AssertionError","message":"expected 2","location":{"path":"/work/app/src/parser.rs","line":88}}}}
            {"event":"suite-finished","suite":"parser"}
            {"event":"run-finished"}
        "#};

        let events: Vec<_> = input
            .lines()
            .enumerate()
            .filter_map(|(index, line)| {
                ReporterEvent::from_json_line(line, index + 1).expect("line is valid")
            })
            .collect();

        assert_eq!(
            events,
            vec![
                ReporterEvent::RunStarted,
                ReporterEvent::SuiteStarted {
                    suite: "parser".to_owned()
                },
                ReporterEvent::TestFinished {
                    result: TestResult::passed(
                        "parser",
                        "parses_empty",
                        SourceLocation::new("/work/app/test/parser_test.rs", 10),
                    )
                    .with_duration(Duration::from_millis(250))
                    .with_assertions(3),
                },
                ReporterEvent::TestFinished {
                    result: TestResult::failed(
                        "parser",
                        "parses_nested",
                        SourceLocation::new("/work/app/test/parser_test.rs", 20),
                        FailureDetail::new(
                            "AssertionError",
                            "expected 2",
                            SourceLocation::new("/work/app/src/parser.rs", 88),
                        ),
                    )
                    .with_duration(Duration::from_millis(1500)),
                },
                ReporterEvent::SuiteFinished {
                    suite: "parser".to_owned()
                },
                ReporterEvent::RunFinished,
            ]
        );
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(ReporterEvent::from_json_line("", 1).unwrap(), None);
        assert_eq!(ReporterEvent::from_json_line("  \t", 2).unwrap(), None);
    }

    #[test]
    fn negative_duration_is_rejected() {
        let line = r#"{"event":"test-finished","result":{"suite":"s","name":"t","passed":true,"duration":-1.0,"location":{"path":"a.rs","line":1}}}"#;
        let error = ReporterEvent::from_json_line(line, 7).unwrap_err();
        assert_eq!(error.line_number(), 7);
    }

    #[test]
    fn unknown_event_is_rejected() {
        let error = ReporterEvent::from_json_line(r#"{"event":"run-paused"}"#, 3).unwrap_err();
        assert_eq!(error.line_number(), 3);
        assert_eq!(error.to_string(), "invalid event on line 3");
    }
}
