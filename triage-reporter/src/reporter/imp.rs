// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregates test events and prints out the report.
//!
//! The main structure in this module is [`Reporter`].

use super::{
    aggregator::{Aggregator, RunTotals},
    displayer::{DisplayReporter, DisplayReporterBuilder},
    events::{ReporterEvent, TestResult},
    outcome::Severity,
    ranking::SingletonPolicy,
};
use crate::{
    config::ReporterConfig, errors::WriteEventError, location::LocationNormalizer, time::Clock,
};
use camino::Utf8PathBuf;
use std::{
    io::{self, Write},
    time::Duration,
};
use tracing::debug;

/// Output destination for the reporter.
///
/// This is usually standard output, but can be an in-memory buffer for tests.
pub enum ReporterOutput<'a> {
    /// Write output to standard output.
    Stdout,

    /// Write output to a buffer.
    Buffer(&'a mut String),
}

impl ReporterOutput<'_> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        if s.is_empty() {
            return Ok(());
        }
        match self {
            Self::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(s.as_bytes())?;
                stdout.flush()
            }
            Self::Buffer(buffer) => {
                buffer.push_str(s);
                Ok(())
            }
        }
    }
}

/// Test reporter builder.
#[derive(Clone, Debug)]
pub struct ReporterBuilder {
    working_dir: Utf8PathBuf,
    test_root: String,
    should_colorize: bool,
    verbose: bool,
    detailed_skip: bool,
    fast_fail: bool,
    show_location: bool,
    slow_count: usize,
    slow_threshold: Duration,
    slow_suite_count: usize,
    slow_suite_threshold: Duration,
    problem_location_count: usize,
    skip_singletons: SingletonPolicy,
    rerun_command: Option<String>,
}

impl ReporterBuilder {
    /// Creates a new builder with default settings.
    ///
    /// Paths in the report are shown relative to `working_dir`, which should be absolute.
    pub fn new(working_dir: impl Into<Utf8PathBuf>) -> Self {
        Self::from_config(working_dir, &ReporterConfig::default(), false)
    }

    /// Creates a new builder with every setting taken from `config`.
    ///
    /// `config.color` is not consulted: the caller resolves it into `should_colorize`, since that
    /// depends on where output is going.
    pub fn from_config(
        working_dir: impl Into<Utf8PathBuf>,
        config: &ReporterConfig,
        should_colorize: bool,
    ) -> Self {
        Self {
            working_dir: working_dir.into(),
            test_root: config.test_root.clone(),
            should_colorize,
            verbose: config.verbose,
            detailed_skip: config.detailed_skip,
            fast_fail: config.fast_fail,
            show_location: config.show_location,
            slow_count: config.slow_count,
            slow_threshold: config.slow_threshold,
            slow_suite_count: config.slow_suite_count,
            slow_suite_threshold: config.slow_suite_threshold,
            problem_location_count: config.problem_location_count,
            skip_singletons: if config.exclude_singleton_skips {
                SingletonPolicy::Exclude
            } else {
                SingletonPolicy::Include
            },
            rerun_command: config.rerun_command.clone(),
        }
    }

    /// Set to true if the reporter should colorize output.
    pub fn set_colorize(&mut self, should_colorize: bool) -> &mut Self {
        self.should_colorize = should_colorize;
        self
    }

    /// Sets verbose output: a status line for every test as it finishes.
    pub fn set_verbose(&mut self, verbose: bool) -> &mut Self {
        self.verbose = verbose;
        self
    }

    /// Sets whether skipped tests get a detail block.
    pub fn set_detailed_skip(&mut self, detailed_skip: bool) -> &mut Self {
        self.detailed_skip = detailed_skip;
        self
    }

    /// Sets fast-fail mode.
    ///
    /// In this mode, failure detail is printed as soon as a test fails, and the final report does
    /// not repeat it.
    pub fn set_fast_fail(&mut self, fast_fail: bool) -> &mut Self {
        self.fast_fail = fast_fail;
        self
    }

    /// Sets whether source locations are appended to test and failure output.
    pub fn set_show_location(&mut self, show_location: bool) -> &mut Self {
        self.show_location = show_location;
        self
    }

    /// Sets the maximum number of slow tests to show.
    pub fn set_slow_count(&mut self, slow_count: usize) -> &mut Self {
        self.slow_count = slow_count;
        self
    }

    /// Sets the minimum duration for a test to count as slow.
    pub fn set_slow_threshold(&mut self, slow_threshold: Duration) -> &mut Self {
        self.slow_threshold = slow_threshold;
        self
    }

    /// Sets the maximum number of slow suites to show.
    pub fn set_slow_suite_count(&mut self, slow_suite_count: usize) -> &mut Self {
        self.slow_suite_count = slow_suite_count;
        self
    }

    /// Sets the minimum duration for a suite to count as slow.
    pub fn set_slow_suite_threshold(&mut self, slow_suite_threshold: Duration) -> &mut Self {
        self.slow_suite_threshold = slow_suite_threshold;
        self
    }

    /// Sets the maximum number of files in each problem-location summary.
    pub fn set_problem_location_count(&mut self, problem_location_count: usize) -> &mut Self {
        self.problem_location_count = problem_location_count;
        self
    }

    /// Sets whether files with a single skipped test appear in the skip summary.
    pub fn set_skip_singletons(&mut self, skip_singletons: SingletonPolicy) -> &mut Self {
        self.skip_singletons = skip_singletons;
        self
    }

    /// Sets the command printed alongside each failing test.
    pub fn set_rerun_command(&mut self, rerun_command: Option<String>) -> &mut Self {
        self.rerun_command = rerun_command;
        self
    }

    /// Sets the directory, relative to the working directory, that holds tests.
    pub fn set_test_root(&mut self, test_root: impl Into<String>) -> &mut Self {
        self.test_root = test_root.into();
        self
    }
}

impl ReporterBuilder {
    /// Creates a new test reporter.
    pub fn build<'a>(&self, output: ReporterOutput<'a>, clock: Box<dyn Clock>) -> Reporter<'a> {
        let normalizer = LocationNormalizer::new(self.working_dir.clone(), &self.test_root);
        let aggregator = Aggregator::new(normalizer, clock);

        let display_reporter = DisplayReporterBuilder {
            verbose: self.verbose,
            detailed_skip: self.detailed_skip,
            fast_fail: self.fast_fail,
            show_location: self.show_location,
            slow_count: self.slow_count,
            slow_threshold: self.slow_threshold,
            slow_suite_count: self.slow_suite_count,
            slow_suite_threshold: self.slow_suite_threshold,
            problem_location_count: self.problem_location_count,
            skip_singletons: self.skip_singletons,
            rerun_command: self.rerun_command.clone(),
            should_colorize: self.should_colorize,
        }
        .build();

        Reporter {
            aggregator,
            display_reporter,
            output,
        }
    }
}

/// Functionality to aggregate test events and report them in a human-readable format.
///
/// Events are expected from a single thread, in lifecycle order.
pub struct Reporter<'a> {
    aggregator: Aggregator,
    display_reporter: DisplayReporter,
    output: ReporterOutput<'a>,
}

impl Reporter<'_> {
    /// Report an event, dispatching it to the matching `on_*` method.
    ///
    /// Returns the status of the run for [`ReporterEvent::RunFinished`], and `None` otherwise.
    pub fn report_event(
        &mut self,
        event: ReporterEvent,
    ) -> Result<Option<Severity>, WriteEventError> {
        match event {
            ReporterEvent::RunStarted => self.on_run_start(),
            ReporterEvent::SuiteStarted { suite } => self.on_suite_start(&suite),
            ReporterEvent::TestFinished { result } => self.on_test_record(result)?,
            ReporterEvent::SuiteFinished { suite } => self.on_suite_end(&suite),
            ReporterEvent::RunFinished => return self.on_run_report().map(Some),
        }
        Ok(None)
    }

    /// Marks the start of the run. Does nothing if the run has already started.
    pub fn on_run_start(&mut self) {
        self.aggregator.start_run();
    }

    /// Marks the start of a suite.
    pub fn on_suite_start(&mut self, suite: &str) {
        self.aggregator.start_suite(suite);
    }

    /// Marks the end of a suite.
    pub fn on_suite_end(&mut self, suite: &str) {
        let timing = self.aggregator.end_suite(suite);
        debug!("suite `{}` finished in {:?}", timing.suite, timing.duration);
    }

    /// Records a test result, printing any live output for it.
    ///
    /// Fails if the result cannot be classified. Such a result is not recorded.
    pub fn on_test_record(&mut self, result: TestResult) -> Result<(), WriteEventError> {
        self.aggregator.record(result)?;

        let mut buf = String::new();
        if let Some(record) = self.aggregator.records().last() {
            self.display_reporter.write_test_finished(
                record,
                self.aggregator.totals(),
                self.aggregator.normalizer(),
                &mut buf,
            );
        }
        self.output.write_str(&buf).map_err(WriteEventError::Io)
    }

    /// Writes the final report and returns the status of the run.
    pub fn on_run_report(&mut self) -> Result<Severity, WriteEventError> {
        let mut buf = String::new();
        self.display_reporter.write_report(&self.aggregator, &mut buf);
        self.output.write_str(&buf).map_err(WriteEventError::Io)?;
        Ok(self.aggregator.totals().status())
    }

    /// Returns the running totals.
    pub fn totals(&self) -> &RunTotals {
        self.aggregator.totals()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{location::SourceLocation, time::ManualClock};

    #[test]
    fn builder_from_config() {
        let config = ReporterConfig {
            verbose: true,
            exclude_singleton_skips: false,
            rerun_command: Some("make test".to_owned()),
            ..ReporterConfig::default()
        };
        let builder = ReporterBuilder::from_config("/work/app", &config, true);
        assert!(builder.verbose);
        assert!(builder.should_colorize);
        assert_eq!(builder.skip_singletons, SingletonPolicy::Include);
        assert_eq!(builder.rerun_command.as_deref(), Some("make test"));
        assert_eq!(builder.slow_threshold, Duration::from_millis(500));
    }

    #[test]
    fn unclassifiable_result_fails_loudly() {
        let mut out = String::new();
        let mut reporter = ReporterBuilder::new("/work/app")
            .build(ReporterOutput::Buffer(&mut out), Box::new(ManualClock::new()));

        let error = reporter
            .on_test_record(TestResult::unset(
                "math",
                "adds",
                SourceLocation::new("/work/app/test/math_test.rs", 1),
            ))
            .unwrap_err();
        assert!(matches!(error, WriteEventError::Unclassifiable(_)));
        assert_eq!(reporter.totals().tests, 0);
    }

    #[test]
    fn report_event_returns_status_on_run_finished() {
        let mut out = String::new();
        let mut reporter = ReporterBuilder::new("/work/app")
            .build(ReporterOutput::Buffer(&mut out), Box::new(ManualClock::new()));

        assert_eq!(reporter.report_event(ReporterEvent::RunStarted).unwrap(), None);
        let result = TestResult::skipped(
            "math",
            "later",
            SourceLocation::new("/work/app/test/math_test.rs", 1),
            None,
        );
        assert_eq!(
            reporter
                .report_event(ReporterEvent::TestFinished { result })
                .unwrap(),
            None
        );
        assert_eq!(
            reporter.report_event(ReporterEvent::RunFinished).unwrap(),
            Some(Severity::Skip)
        );
        drop(reporter);
        assert!(out.contains("SKIP 1 skips. 1 tests & 0 assertions"), "{out}");
    }
}
