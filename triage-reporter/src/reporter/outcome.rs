// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of test results into outcomes and severities.

use super::events::{FailureDetail, TestResult};
use crate::{
    errors::{UnclassifiableReason, UnclassifiableResultError},
    location::SourceLocation,
};
use std::{fmt, time::Duration};

/// The outcome of a single test. Exactly one variant holds for any recorded test.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TestOutcome {
    /// The test passed.
    Passed,

    /// The test was skipped, possibly with a reason.
    Skipped {
        /// Why the test was skipped, if the engine said.
        detail: Option<FailureDetail>,
    },

    /// The test raised an unexpected error.
    Error(FailureDetail),

    /// The test failed an assertion.
    Failed(FailureDetail),
}

impl TestOutcome {
    /// Returns the severity of this outcome.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Passed => Severity::Pass,
            Self::Skipped { .. } => Severity::Skip,
            Self::Error(_) => Severity::Error,
            Self::Failed(_) => Severity::Failure,
        }
    }

    /// Returns the single-character result code for this outcome.
    pub fn result_code(&self) -> char {
        match self {
            Self::Passed => '.',
            Self::Skipped { .. } => 'S',
            Self::Error(_) => 'E',
            Self::Failed(_) => 'F',
        }
    }

    /// Returns the failure detail, if any.
    pub fn detail(&self) -> Option<&FailureDetail> {
        match self {
            Self::Passed => None,
            Self::Skipped { detail } => detail.as_ref(),
            Self::Error(detail) | Self::Failed(detail) => Some(detail),
        }
    }

    /// Returns true if this outcome is an error or a failure.
    pub fn is_problem(&self) -> bool {
        matches!(self, Self::Error(_) | Self::Failed(_))
    }
}

/// How bad an outcome, or a run as a whole, is.
///
/// Errors and failures share the highest [rank](Self::rank). When a single status is needed for a
/// run, failures win over errors.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Severity {
    /// Everything passed.
    Pass,

    /// Something was skipped.
    Skip,

    /// Something raised an unexpected error.
    Error,

    /// Something failed an assertion.
    Failure,
}

impl Severity {
    /// Returns the rank of this severity. Higher is worse.
    pub fn rank(self) -> u8 {
        match self {
            Self::Pass => 0,
            Self::Skip => 1,
            Self::Error | Self::Failure => 2,
        }
    }

    /// Returns the worst-case status for a run with the given counts.
    pub fn for_run(failures: usize, errors: usize, skips: usize) -> Self {
        if failures > 0 {
            Self::Failure
        } else if errors > 0 {
            Self::Error
        } else if skips > 0 {
            Self::Skip
        } else {
            Self::Pass
        }
    }

    /// Returns true if a run with this status should be considered successful.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Pass | Self::Skip)
    }

    /// Returns the status word displayed for this severity.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Skip => "SKIP",
            Self::Error => "ERROR",
            Self::Failure => "FAIL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One executed and classified test.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestRecord {
    /// The suite the test belongs to.
    pub suite: String,

    /// The name of the test.
    pub name: String,

    /// What happened.
    pub outcome: TestOutcome,

    /// How long the test took.
    pub duration: Duration,

    /// The number of assertions the test made.
    pub assertions: u64,

    /// Where the test is defined.
    pub location: SourceLocation,
}

impl TestRecord {
    /// Returns a displayer for `suite::name`.
    pub fn display_name(&self) -> DisplayTestName<'_> {
        DisplayTestName {
            suite: &self.suite,
            name: &self.name,
        }
    }
}

/// Displays a test as `suite::name`.
///
/// Returned by [`TestRecord::display_name`].
#[derive(Clone, Copy, Debug)]
pub struct DisplayTestName<'a> {
    suite: &'a str,
    name: &'a str,
}

impl fmt::Display for DisplayTestName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.suite, self.name)
    }
}

/// Classifies a result delivered by the engine.
///
/// Flags are checked in priority order: passed, then skipped, then error, then the presence of
/// failure detail. A result matching none of these, or an error without detail, is rejected.
pub fn classify(result: TestResult) -> Result<TestRecord, UnclassifiableResultError> {
    let TestResult {
        suite,
        name,
        passed,
        skipped,
        error,
        duration,
        assertions,
        location,
        failure,
    } = result;

    let outcome = if passed {
        TestOutcome::Passed
    } else if skipped {
        TestOutcome::Skipped { detail: failure }
    } else if error {
        match failure {
            Some(detail) => TestOutcome::Error(detail),
            None => {
                return Err(UnclassifiableResultError::new(
                    suite,
                    name,
                    UnclassifiableReason::ErrorWithoutDetail,
                ));
            }
        }
    } else if let Some(detail) = failure {
        TestOutcome::Failed(detail)
    } else {
        return Err(UnclassifiableResultError::new(
            suite,
            name,
            UnclassifiableReason::NoOutcome,
        ));
    };

    Ok(TestRecord {
        suite,
        name,
        outcome,
        duration,
        assertions,
        location,
    })
}
