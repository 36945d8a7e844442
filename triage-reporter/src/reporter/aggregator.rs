// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run-scoped accumulation of test records and suite timings.
//!
//! The [`Aggregator`] only accumulates. Clustering views are derived on demand from the full
//! record collection by the `*_buckets` methods, which never mutate state.

use super::{
    events::TestResult,
    outcome::{Severity, TestOutcome, TestRecord, classify},
};
use crate::{
    errors::UnclassifiableResultError,
    helpers::non_blank,
    location::LocationNormalizer,
    time::Clock,
};
use camino::Utf8PathBuf;
use std::{
    collections::HashMap,
    fmt,
    time::{Duration, Instant},
};
use tracing::debug;

/// Running counters for a test run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunTotals {
    /// The number of tests recorded.
    pub tests: usize,

    /// The total number of assertions made.
    pub assertions: u64,

    /// The number of tests that passed.
    pub passes: usize,

    /// The number of tests that failed an assertion.
    pub failures: usize,

    /// The number of tests that raised an unexpected error.
    pub errors: usize,

    /// The number of tests that were skipped.
    pub skips: usize,
}

impl RunTotals {
    fn add(&mut self, record: &TestRecord) {
        self.tests += 1;
        self.assertions = self.assertions.saturating_add(record.assertions);
        match record.outcome {
            TestOutcome::Passed => self.passes += 1,
            TestOutcome::Skipped { .. } => self.skips += 1,
            TestOutcome::Error(_) => self.errors += 1,
            TestOutcome::Failed(_) => self.failures += 1,
        }
    }

    /// Returns true if at least one test failed or errored.
    ///
    /// Once this is true, timing and skip information is no longer reported.
    pub fn has_big_problems(&self) -> bool {
        self.failures > 0 || self.errors > 0
    }

    /// Returns the worst-case status of the run.
    pub fn status(&self) -> Severity {
        Severity::for_run(self.failures, self.errors, self.skips)
    }
}

/// How long a suite took to run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SuiteTiming {
    /// The name of the suite.
    pub suite: String,

    /// The time between the suite starting and finishing, or zero if no start was seen.
    pub duration: Duration,
}

/// Tests clustered by the file they are defined in.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LineBucket {
    /// The number of tests in this bucket.
    pub count: usize,

    /// The definition line of each test, in the order the tests were recorded.
    pub lines: Vec<u32>,
}

/// Failures clustered by the file the failure was triggered in.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SiteBucket {
    /// The number of failures in this bucket.
    pub count: usize,

    /// The message of the first failure recorded here, if it wasn't blank.
    pub message: Option<String>,
}

/// Accumulates everything the final report needs, as events arrive.
pub struct Aggregator {
    normalizer: LocationNormalizer,
    clock: Box<dyn Clock>,
    run_start: Option<Instant>,
    totals: RunTotals,
    suite_starts: HashMap<String, Instant>,
    suite_timings: Vec<SuiteTiming>,
    records: Vec<TestRecord>,
}

impl fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator")
            .field("normalizer", &self.normalizer)
            .field("run_start", &self.run_start)
            .field("totals", &self.totals)
            .field("suite_starts", &self.suite_starts)
            .field("suite_timings", &self.suite_timings)
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}

impl Aggregator {
    /// Creates a new aggregator with no run in progress.
    pub fn new(normalizer: LocationNormalizer, clock: Box<dyn Clock>) -> Self {
        Self {
            normalizer,
            clock,
            run_start: None,
            totals: RunTotals::default(),
            suite_starts: HashMap::new(),
            suite_timings: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Marks the start of the run.
    ///
    /// Returns false, and changes nothing, if a run is already in progress.
    pub fn start_run(&mut self) -> bool {
        if self.run_start.is_some() {
            debug!("run start received while a run is in progress, ignoring");
            return false;
        }
        self.run_start = Some(self.clock.now());
        self.totals = RunTotals::default();
        true
    }

    /// Records the start of a suite. A duplicate start replaces the earlier one.
    pub fn start_suite(&mut self, suite: &str) {
        self.ensure_started();
        let now = self.clock.now();
        if self.suite_starts.insert(suite.to_owned(), now).is_some() {
            debug!("suite `{suite}` started again before it finished, using the later start");
        }
    }

    /// Records the end of a suite and returns its timing.
    pub fn end_suite(&mut self, suite: &str) -> &SuiteTiming {
        self.ensure_started();
        let duration = match self.suite_starts.remove(suite) {
            Some(start) => self.clock.now().saturating_duration_since(start),
            None => {
                debug!("suite `{suite}` finished without starting, recording zero duration");
                Duration::ZERO
            }
        };
        self.suite_timings.push(SuiteTiming {
            suite: suite.to_owned(),
            duration,
        });
        &self.suite_timings[self.suite_timings.len() - 1]
    }

    /// Classifies and records one test result.
    pub fn record(&mut self, result: TestResult) -> Result<&TestRecord, UnclassifiableResultError> {
        self.ensure_started();
        let record = classify(result)?;
        self.totals.add(&record);
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Returns the running totals.
    pub fn totals(&self) -> &RunTotals {
        &self.totals
    }

    /// Returns every record, in the order recorded.
    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    /// Returns every finished suite, in the order finished.
    pub fn suite_timings(&self) -> &[SuiteTiming] {
        &self.suite_timings
    }

    /// Returns the normalizer used for bucket keys.
    pub fn normalizer(&self) -> &LocationNormalizer {
        &self.normalizer
    }

    /// Returns the wall-clock time since the run started, or zero if it never did.
    pub fn wall_time(&self) -> Duration {
        self.run_start
            .map_or(Duration::ZERO, |start| {
                self.clock.now().saturating_duration_since(start)
            })
    }

    /// Clusters skipped tests by the file they are defined in.
    pub fn skip_location_buckets(&self) -> HashMap<Utf8PathBuf, LineBucket> {
        self.line_buckets(|outcome| matches!(outcome, TestOutcome::Skipped { .. }))
    }

    /// Clusters failed and errored tests by the file they are defined in.
    pub fn failure_location_buckets(&self) -> HashMap<Utf8PathBuf, LineBucket> {
        self.line_buckets(TestOutcome::is_problem)
    }

    /// Clusters failed and errored tests by the file the failure was triggered in.
    pub fn failure_site_buckets(&self) -> HashMap<Utf8PathBuf, SiteBucket> {
        let mut buckets: HashMap<Utf8PathBuf, SiteBucket> = HashMap::new();
        for record in &self.records {
            let detail = match &record.outcome {
                TestOutcome::Error(detail) | TestOutcome::Failed(detail) => detail,
                TestOutcome::Passed | TestOutcome::Skipped { .. } => continue,
            };
            let key = self.normalizer.normalize(&detail.location.path).to_owned();
            let bucket = buckets.entry(key).or_insert_with(|| SiteBucket {
                count: 0,
                message: non_blank(&detail.message).map(str::to_owned),
            });
            bucket.count += 1;
        }
        buckets
    }

    fn line_buckets(
        &self,
        mut include: impl FnMut(&TestOutcome) -> bool,
    ) -> HashMap<Utf8PathBuf, LineBucket> {
        let mut buckets: HashMap<Utf8PathBuf, LineBucket> = HashMap::new();
        for record in self.records.iter().filter(|r| include(&r.outcome)) {
            let key = self.normalizer.normalize(&record.location.path).to_owned();
            let bucket = buckets.entry(key).or_default();
            bucket.count += 1;
            bucket.lines.push(record.location.line);
        }
        buckets
    }

    fn ensure_started(&mut self) {
        if self.run_start.is_none() {
            debug!("event received before run start, starting the run implicitly");
            self.run_start = Some(self.clock.now());
        }
    }
}
