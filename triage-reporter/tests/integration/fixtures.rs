// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;
use triage_reporter::{
    location::SourceLocation,
    reporter::{FailureDetail, Reporter, ReporterEvent, Severity},
    time::ManualClock,
};

pub(crate) const WORKING_DIR: &str = "/work/app";

/// A location under the fixture working directory.
pub(crate) fn at(path: &str, line: u32) -> SourceLocation {
    SourceLocation::new(format!("{WORKING_DIR}/{path}"), line)
}

pub(crate) fn assertion(message: &str, site: SourceLocation) -> FailureDetail {
    FailureDetail::new("AssertionError", message, site)
}

/// One step of a scripted run: either an event, or time passing on the clock.
pub(crate) enum Step {
    Event(ReporterEvent),
    Wait(Duration),
}

impl Step {
    pub(crate) fn suite_started(suite: &str) -> Self {
        Self::Event(ReporterEvent::SuiteStarted {
            suite: suite.to_owned(),
        })
    }

    pub(crate) fn suite_finished(suite: &str) -> Self {
        Self::Event(ReporterEvent::SuiteFinished {
            suite: suite.to_owned(),
        })
    }
}

/// Feeds `steps` to the reporter, returning the status reported on `RunFinished`.
pub(crate) fn play(
    reporter: &mut Reporter<'_>,
    clock: &ManualClock,
    steps: impl IntoIterator<Item = Step>,
) -> Option<Severity> {
    let mut status = None;
    for step in steps {
        match step {
            Step::Event(event) => {
                if let Some(run_status) = reporter.report_event(event).expect("event is valid") {
                    status = Some(run_status);
                }
            }
            Step::Wait(duration) => clock.advance(duration),
        }
    }
    status
}
