// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for triage.
//!
//! The embedded [default config](ReporterConfig::DEFAULT_CONFIG) is always read first. A user config
//! file, if any, is layered on top of it.

use crate::errors::{ConfigParseError, ConfigParseErrorKind};
use camino::Utf8Path;
use config::{Config, ConfigError, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::{collections::BTreeSet, sync::LazyLock, time::Duration};
use tracing::warn;

/// The resolved reporter configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ReporterConfig {
    /// Print a status line as each test finishes.
    pub verbose: bool,

    /// Show full detail for skipped tests.
    pub detailed_skip: bool,

    /// Print failure detail as soon as a test fails.
    pub fast_fail: bool,

    /// Whether to color output.
    pub color: ColorChoice,

    /// Append source locations to test and failure output.
    pub show_location: bool,

    /// The maximum number of slow tests to show.
    pub slow_count: usize,

    /// The minimum duration for a test to count as slow.
    #[serde(with = "humantime_serde")]
    pub slow_threshold: Duration,

    /// The maximum number of slow suites to show.
    pub slow_suite_count: usize,

    /// The minimum duration for a suite to count as slow.
    #[serde(with = "humantime_serde")]
    pub slow_suite_threshold: Duration,

    /// The maximum number of files to show in each problem-location summary.
    pub problem_location_count: usize,

    /// Leave files with a single skipped test out of the skip summary.
    pub exclude_singleton_skips: bool,

    /// A command to print alongside each failing test so it can be rerun.
    #[serde(default)]
    pub rerun_command: Option<String>,

    /// The directory, relative to the working directory, that holds tests.
    pub test_root: String,
}

impl ReporterConfig {
    /// Contains the default config as a TOML file.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the config, layering `config_file` (if any) on top of the defaults.
    ///
    /// Unknown keys are reported as warnings, not errors.
    pub fn from_sources(config_file: Option<&Utf8Path>) -> Result<Self, ConfigParseError> {
        Self::from_sources_impl(config_file, |config_file, unknown| {
            for key in unknown {
                warn!("in config file {config_file}, ignoring unknown configuration key `{key}`");
            }
        })
    }

    // A custom unknown_callback can be passed in while testing.
    fn from_sources_impl(
        config_file: Option<&Utf8Path>,
        mut unknown_callback: impl FnMut(&Utf8Path, &BTreeSet<String>),
    ) -> Result<Self, ConfigParseError> {
        let mut builder =
            Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml));
        let source_name = match config_file {
            Some(config_file) => {
                builder = builder.add_source(File::new(config_file.as_str(), FileFormat::Toml));
                config_file
            }
            None => Utf8Path::new("<default config>"),
        };

        let config = builder.build().map_err(|error| {
            ConfigParseError::new(
                source_name,
                ConfigParseErrorKind::BuildError(Box::new(error)),
            )
        })?;

        let mut ignored = BTreeSet::new();
        let mut cb = |path: serde_ignored::Path| {
            ignored.insert(path.to_string());
        };
        let ignored_de = serde_ignored::Deserializer::new(config, &mut cb);
        let config: Self = serde_path_to_error::deserialize(ignored_de).map_err(|error| {
            // The config crate also reports the key, but the path is already tracked.
            let path = error.path().clone();
            let error = match error.into_inner() {
                ConfigError::At { error, .. } => *error,
                other => other,
            };
            ConfigParseError::new(
                source_name,
                ConfigParseErrorKind::DeserializeError(Box::new(
                    serde_path_to_error::Error::new(path, error),
                )),
            )
        })?;

        if !ignored.is_empty() {
            unknown_callback(source_name, &ignored);
        }

        Ok(config)
    }
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            detailed_skip: false,
            fast_fail: false,
            color: ColorChoice::Auto,
            show_location: false,
            slow_count: 5,
            slow_threshold: Duration::from_millis(500),
            slow_suite_count: 5,
            slow_suite_threshold: Duration::from_secs(1),
            problem_location_count: 5,
            exclude_singleton_skips: true,
            rerun_command: None,
            test_root: "test".to_owned(),
        }
    }
}

/// Whether to color output.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum ColorChoice {
    /// Color if the output looks like a color-capable terminal.
    #[default]
    Auto,

    /// Always color.
    Always,

    /// Never color.
    Never,
}

impl ColorChoice {
    /// Decides whether to color output in the given terminal context.
    pub fn should_colorize(self, context: &TerminalContext) -> bool {
        match self {
            Self::Auto => context.supports_color(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// What is known about the terminal that output is going to.
///
/// Only the binary reads this from the process environment. Everything else takes it as an
/// argument.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TerminalContext {
    /// Whether the output stream is a terminal.
    pub is_terminal: bool,

    /// The value of `TERM`, if set.
    pub term: Option<String>,

    /// The value of `EMACS`, if set.
    pub emacs: Option<String>,
}

static COLOR_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^screen|color").expect("color term regex is valid"));

impl TerminalContext {
    /// Reads the context for standard output from the environment.
    pub fn from_env() -> Self {
        use std::io::IsTerminal;

        Self {
            is_terminal: std::io::stdout().is_terminal(),
            term: std::env::var("TERM").ok(),
            emacs: std::env::var("EMACS").ok(),
        }
    }

    /// Returns true if output should be colored when the user has not said either way.
    ///
    /// That is the case for terminals whose `TERM` starts with `screen` or mentions `color`, and
    /// for Emacs shells.
    pub fn supports_color(&self) -> bool {
        if !self.is_terminal {
            return false;
        }
        let term_matches = self
            .term
            .as_deref()
            .is_some_and(|term| COLOR_TERM.is_match(term));
        term_matches || self.emacs.as_deref() == Some("t")
    }
}
