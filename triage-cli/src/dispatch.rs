// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line parsing and event replay.

use crate::{
    errors::{ExpectedError, Result},
    exit_codes::TriageExitCode,
    output::{Color, init_logger},
};
use camino::Utf8PathBuf;
use clap::{Args, Parser};
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    time::Duration,
};
use tracing::{debug, warn};
use triage_reporter::{
    config::{ReporterConfig, TerminalContext},
    reporter::{Reporter, ReporterBuilder, ReporterEvent, ReporterOutput, Severity},
    time::SystemClock,
};

/// Summarize a test run, most significant problems first.
///
/// Reads a stream of JSON-lines test events from a file or standard input, and writes a report to
/// standard output.
#[derive(Debug, Parser)]
#[command(
    name = "triage",
    version,
    styles = crate::output::clap_styles::style(),
    max_term_width = 100,
)]
pub struct TriageApp {
    /// Path to the event stream [default: standard input]
    #[arg(value_name = "PATH")]
    input: Option<Utf8PathBuf>,

    /// Config file [default: none, built-in defaults only]
    #[arg(long, value_name = "PATH")]
    config: Option<Utf8PathBuf>,

    /// Produce color output: auto, always, never [default: from config]
    #[arg(long, value_enum, hide_possible_values = true, value_name = "WHEN")]
    color: Option<Color>,

    #[command(flatten)]
    reporter_opts: ReporterOpts,
}

#[derive(Debug, Default, Args)]
#[command(next_help_heading = "Reporter options")]
struct ReporterOpts {
    /// Print a status line as each test finishes
    #[arg(long)]
    verbose: bool,

    /// Show full detail for skipped tests
    #[arg(long)]
    detailed_skip: bool,

    /// Print failure detail as soon as a test fails
    #[arg(long)]
    fast_fail: bool,

    /// Append source locations to test and failure output
    #[arg(long)]
    show_location: bool,

    /// Maximum number of slow tests to show
    #[arg(long, value_name = "N")]
    slow_count: Option<usize>,

    /// Minimum duration for a test to count as slow, e.g. "500ms"
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    slow_threshold: Option<Duration>,

    /// Maximum number of slow suites to show
    #[arg(long, value_name = "N")]
    slow_suite_count: Option<usize>,

    /// Minimum duration for a suite to count as slow, e.g. "2s"
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    slow_suite_threshold: Option<Duration>,
}

impl ReporterOpts {
    /// Overrides config values with those given on the command line.
    fn apply_to(&self, config: &mut ReporterConfig) {
        config.verbose |= self.verbose;
        config.detailed_skip |= self.detailed_skip;
        config.fast_fail |= self.fast_fail;
        config.show_location |= self.show_location;
        if let Some(slow_count) = self.slow_count {
            config.slow_count = slow_count;
        }
        if let Some(slow_threshold) = self.slow_threshold {
            config.slow_threshold = slow_threshold;
        }
        if let Some(slow_suite_count) = self.slow_suite_count {
            config.slow_suite_count = slow_suite_count;
        }
        if let Some(slow_suite_threshold) = self.slow_suite_threshold {
            config.slow_suite_threshold = slow_suite_threshold;
        }
    }
}

impl TriageApp {
    /// Executes the app, returning the exit code for the process.
    pub fn exec(self) -> Result<i32> {
        // Log with the color setting from the command line until the config is read.
        init_logger(self.color.unwrap_or_default().into());

        let config = self.resolve_config()?;
        let should_colorize = config.color.should_colorize(&TerminalContext::from_env());

        let working_dir = current_dir()?;
        debug!("reporting relative to {working_dir}");
        let builder = ReporterBuilder::from_config(working_dir, &config, should_colorize);
        let mut reporter = builder.build(ReporterOutput::Stdout, Box::new(SystemClock));

        let status = match &self.input {
            Some(path) => {
                let file = File::open(path).map_err(|err| ExpectedError::InputOpenFailed {
                    path: path.clone(),
                    err,
                })?;
                replay_events(BufReader::new(file), &mut reporter)?
            }
            None => replay_events(io::stdin().lock(), &mut reporter)?,
        };

        Ok(exit_code_for(status))
    }

    fn resolve_config(&self) -> Result<ReporterConfig> {
        let mut config = ReporterConfig::from_sources(self.config.as_deref())?;
        self.reporter_opts.apply_to(&mut config);
        if let Some(color) = self.color {
            config.color = color.into();
        }
        Ok(config)
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let dir = std::env::current_dir().map_err(|err| ExpectedError::CurrentDirFailed { err })?;
    Utf8PathBuf::try_from(dir).map_err(|error| ExpectedError::CurrentDirInvalidUtf8 {
        path: error.into_path_buf(),
    })
}

/// Feeds every event in `input` to the reporter and returns the status of the run.
///
/// If the stream ends before the run finishes, the report is produced anyway.
pub(crate) fn replay_events(input: impl BufRead, reporter: &mut Reporter<'_>) -> Result<Severity> {
    for (index, line) in input.lines().enumerate() {
        let line = line.map_err(|err| ExpectedError::InputReadFailed { err })?;
        let Some(event) = ReporterEvent::from_json_line(&line, index + 1)? else {
            continue;
        };
        if let Some(status) = reporter.report_event(event)? {
            debug!("run finished on line {}, ignoring the rest of the input", index + 1);
            return Ok(status);
        }
    }

    warn!("event stream ended before the run finished, reporting what was received");
    Ok(reporter.on_run_report()?)
}

fn exit_code_for(status: Severity) -> i32 {
    if status.is_success() {
        TriageExitCode::OK
    } else {
        TriageExitCode::TESTS_FAILED
    }
}
