// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by triage-reporter.

use camino::{Utf8Path, Utf8PathBuf};
use config::ConfigError;
use std::fmt;
use thiserror::Error;

/// An error that occurred while parsing the reporter config.
#[derive(Debug, Error)]
#[error("failed to parse triage config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8Path {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing the reporter config.
///
/// Returned by [`ConfigParseError::kind`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config, for example because the file could not be
    /// read or is not valid TOML.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),
}

/// A test result delivered by the engine could not be classified into an outcome.
///
/// Such a result is never recorded.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("test result for `{suite}::{name}` has no classifiable outcome: {reason}")]
pub struct UnclassifiableResultError {
    suite: String,
    name: String,
    reason: UnclassifiableReason,
}

impl UnclassifiableResultError {
    pub(crate) fn new(
        suite: impl Into<String>,
        name: impl Into<String>,
        reason: UnclassifiableReason,
    ) -> Self {
        Self {
            suite: suite.into(),
            name: name.into(),
            reason,
        }
    }

    /// Returns the suite of the offending result.
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Returns the name of the offending result.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns why the result could not be classified.
    pub fn reason(&self) -> UnclassifiableReason {
        self.reason
    }
}

/// Why a test result could not be classified.
///
/// Part of [`UnclassifiableResultError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum UnclassifiableReason {
    /// No outcome flag was set and no failure detail was present.
    NoOutcome,

    /// The result was marked as an error but carried no failure detail.
    ErrorWithoutDetail,
}

impl fmt::Display for UnclassifiableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOutcome => write!(f, "no outcome flag is set and no failure detail is present"),
            Self::ErrorWithoutDetail => {
                write!(f, "marked as an error but carries no failure detail")
            }
        }
    }
}

/// An error that occurred while decoding one line of a JSON-lines event stream.
#[derive(Debug, Error)]
#[error("invalid event on line {line_number}")]
pub struct EventParseError {
    line_number: usize,
    #[source]
    error: serde_json::Error,
}

impl EventParseError {
    pub(crate) fn new(line_number: usize, error: serde_json::Error) -> Self {
        Self { line_number, error }
    }

    /// Returns the 1-based line number of the offending line.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

/// An error that occurs while processing an event.
#[derive(Debug, Error)]
pub enum WriteEventError {
    /// An error occurred while writing output.
    #[error("error writing to output")]
    Io(#[source] std::io::Error),

    /// A test result could not be classified.
    #[error("failed to record test result")]
    Unclassifiable(#[from] UnclassifiableResultError),
}
