// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prints out live per-test output and the final report in a human-friendly format.

use super::formatters::{
    DisplayBracketedDuration, DisplayLines, write_counts, write_performance,
};
use crate::{
    helpers::{first_line, non_blank},
    location::LocationNormalizer,
    reporter::{
        aggregator::{Aggregator, RunTotals},
        helpers::Styles,
        outcome::{TestOutcome, TestRecord},
        ranking::{SingletonPolicy, top_n, top_slowest},
    },
};
use owo_colors::OwoColorize;
use std::time::Duration;
use swrite::{SWrite, swrite, swriteln};

pub(crate) struct DisplayReporterBuilder {
    pub(crate) verbose: bool,
    pub(crate) detailed_skip: bool,
    pub(crate) fast_fail: bool,
    pub(crate) show_location: bool,
    pub(crate) slow_count: usize,
    pub(crate) slow_threshold: Duration,
    pub(crate) slow_suite_count: usize,
    pub(crate) slow_suite_threshold: Duration,
    pub(crate) problem_location_count: usize,
    pub(crate) skip_singletons: SingletonPolicy,
    pub(crate) rerun_command: Option<String>,
    pub(crate) should_colorize: bool,
}

impl DisplayReporterBuilder {
    pub(crate) fn build(self) -> DisplayReporter {
        let mut styles = Styles::default();
        if self.should_colorize {
            styles.colorize();
        }

        DisplayReporter {
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
            rerun_command: self.rerun_command,
            styles,
        }
    }
}

/// Functionality to report test results to the output, in a human-readable format.
pub(crate) struct DisplayReporter {
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
    styles: Styles,
}

impl DisplayReporter {
    /// Writes whatever should be shown as soon as a test finishes.
    ///
    /// `totals` must already include `record`.
    pub(crate) fn write_test_finished(
        &self,
        record: &TestRecord,
        totals: &RunTotals,
        normalizer: &LocationNormalizer,
        writer: &mut String,
    ) {
        if self.verbose {
            self.write_status_line(record, normalizer, writer);
        }
        if !self.fast_fail {
            return;
        }

        let show_detail = match &record.outcome {
            TestOutcome::Passed => false,
            TestOutcome::Skipped { .. } => self.detailed_skip && !totals.has_big_problems(),
            TestOutcome::Error(_) | TestOutcome::Failed(_) => true,
        };
        if show_detail {
            // The status line already serves as the header in verbose mode.
            if !self.verbose {
                self.write_status_line(record, normalizer, writer);
            }
            self.write_detail_body(record, normalizer, writer);
        }
    }

    /// Writes the final report, section by section.
    pub(crate) fn write_report(&self, aggregator: &Aggregator, writer: &mut String) {
        let totals = aggregator.totals();
        let normalizer = aggregator.normalizer();

        // Detail was already shown inline in fast-fail mode.
        if !self.fast_fail {
            for record in aggregator.records() {
                if self.wants_detail(&record.outcome) {
                    self.write_status_line(record, normalizer, writer);
                    self.write_detail_body(record, normalizer, writer);
                }
            }
        }

        write_counts(totals, &self.styles, writer);
        write_performance(totals, aggregator.wall_time(), writer);

        let big_problems = totals.has_big_problems();
        if !big_problems && totals.skips == 0 {
            self.write_slowest_tests(aggregator, writer);
            self.write_slowest_suites(aggregator, writer);
        }

        if big_problems {
            self.write_problem_test_locations(aggregator, writer);
            self.write_problem_code_locations(aggregator, writer);
        } else if totals.skips > 0 {
            self.write_skip_locations(aggregator, writer);
        }
    }

    fn wants_detail(&self, outcome: &TestOutcome) -> bool {
        match outcome {
            TestOutcome::Passed => false,
            TestOutcome::Skipped { .. } => self.detailed_skip,
            TestOutcome::Error(_) | TestOutcome::Failed(_) => true,
        }
    }

    fn write_status_line(
        &self,
        record: &TestRecord,
        normalizer: &LocationNormalizer,
        writer: &mut String,
    ) {
        let severity = record.outcome.severity();
        swrite!(
            writer,
            "{:>12} {}{}",
            severity.as_str().style(self.styles.for_severity(severity)),
            DisplayBracketedDuration(record.duration),
            record.display_name(),
        );
        if self.show_location {
            swrite!(
                writer,
                " ({}:{})",
                normalizer.normalize(&record.location.path),
                record.location.line,
            );
        }
        writer.push('\n');
    }

    fn write_detail_body(
        &self,
        record: &TestRecord,
        normalizer: &LocationNormalizer,
        writer: &mut String,
    ) {
        if let Some(detail) = record.outcome.detail() {
            if let Some(message) = non_blank(&detail.message) {
                let mut lines = message.lines();
                let first = lines.next().unwrap_or_default();
                swriteln!(writer, "    {}: {first}", detail.exception.style(self.styles.header));
                for line in lines {
                    swriteln!(writer, "    {line}");
                }
                if self.show_location {
                    swriteln!(
                        writer,
                        "    at {}:{}",
                        normalizer
                            .normalize(&detail.location.path)
                            .style(self.styles.location),
                        detail.location.line,
                    );
                }
            }
        }

        if let Some(command) = &self.rerun_command {
            if record.outcome.is_problem() {
                swriteln!(
                    writer,
                    "    rerun: {command} {}:{}",
                    normalizer.normalize(&record.location.path),
                    record.location.line,
                );
            }
        }

        writer.push('\n');
    }

    fn write_slowest_tests(&self, aggregator: &Aggregator, writer: &mut String) {
        let slowest = top_slowest(aggregator.records(), self.slow_count, self.slow_threshold);
        if slowest.is_empty() {
            return;
        }

        swriteln!(writer, "\n{}", "Slowest tests:".style(self.styles.header));
        for record in slowest {
            swriteln!(
                writer,
                "  {}{}",
                DisplayBracketedDuration(record.duration),
                record.display_name(),
            );
        }
    }

    fn write_slowest_suites(&self, aggregator: &Aggregator, writer: &mut String) {
        let slowest = top_slowest(
            aggregator.suite_timings(),
            self.slow_suite_count,
            self.slow_suite_threshold,
        );
        if slowest.is_empty() {
            return;
        }

        swriteln!(writer, "\n{}", "Slowest suites:".style(self.styles.header));
        for timing in slowest {
            swriteln!(
                writer,
                "  {}{}",
                DisplayBracketedDuration(timing.duration),
                timing.suite,
            );
        }
    }

    fn write_problem_test_locations(&self, aggregator: &Aggregator, writer: &mut String) {
        let buckets = aggregator.failure_location_buckets();
        let top = top_n(&buckets, self.problem_location_count, SingletonPolicy::Exclude);
        if top.is_empty() {
            return;
        }

        swriteln!(
            writer,
            "\n{}",
            "Top problem test locations:".style(self.styles.header)
        );
        for (path, bucket) in top {
            swriteln!(
                writer,
                "  {}: {} ({})",
                path.style(self.styles.location),
                bucket.count.style(self.styles.count),
                DisplayLines(&bucket.lines),
            );
        }
    }

    fn write_problem_code_locations(&self, aggregator: &Aggregator, writer: &mut String) {
        let buckets = aggregator.failure_site_buckets();
        let top = top_n(&buckets, self.problem_location_count, SingletonPolicy::Exclude);
        if top.is_empty() {
            return;
        }

        swriteln!(
            writer,
            "\n{}",
            "Top problem code locations:".style(self.styles.header)
        );
        for (path, bucket) in top {
            swrite!(
                writer,
                "  {}: {}",
                path.style(self.styles.location),
                bucket.count.style(self.styles.count),
            );
            if let Some(example) = bucket.message.as_deref().and_then(first_line) {
                swrite!(writer, ", e.g. \"{example}\"");
            }
            writer.push('\n');
        }
    }

    fn write_skip_locations(&self, aggregator: &Aggregator, writer: &mut String) {
        let buckets = aggregator.skip_location_buckets();
        let top = top_n(&buckets, self.problem_location_count, self.skip_singletons);
        if top.is_empty() {
            return;
        }

        swriteln!(
            writer,
            "\n{}",
            "Skipped test locations:".style(self.styles.header)
        );
        for (path, bucket) in top {
            swriteln!(
                writer,
                "  {}: {} ({})",
                path.style(self.styles.location),
                bucket.count.style(self.styles.count),
                DisplayLines(&bucket.lines),
            );
        }
    }
}
