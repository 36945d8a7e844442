// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{exit_codes::TriageExitCode, output::NO_HEADING_TARGET};
use camino::Utf8PathBuf;
use std::{error::Error, path::PathBuf};
use thiserror::Error;
use tracing::error;
use triage_reporter::errors::{
    ConfigParseError, EventParseError, UnclassifiableResultError, WriteEventError,
};

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method.

/// An error that triage knows how to describe to the user.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("could not determine the current directory")]
    CurrentDirFailed {
        #[source]
        err: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 { path: PathBuf },
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("failed to open input file")]
    InputOpenFailed {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to read input")]
    InputReadFailed {
        #[source]
        err: std::io::Error,
    },
    #[error("event parse error")]
    EventParseError {
        #[from]
        err: EventParseError,
    },
    #[error("unclassifiable test result")]
    UnclassifiableResult {
        #[from]
        err: UnclassifiableResultError,
    },
    #[error("failed to write output")]
    WriteOutputFailed {
        #[source]
        err: std::io::Error,
    },
}

impl From<WriteEventError> for ExpectedError {
    fn from(error: WriteEventError) -> Self {
        match error {
            WriteEventError::Io(err) => Self::WriteOutputFailed { err },
            WriteEventError::Unclassifiable(err) => Self::UnclassifiableResult { err },
        }
    }
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirFailed { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::ConfigParseError { .. }
            | Self::InputOpenFailed { .. }
            | Self::InputReadFailed { .. } => TriageExitCode::SETUP_ERROR,
            Self::EventParseError { .. } | Self::UnclassifiableResult { .. } => {
                TriageExitCode::INVALID_EVENT_STREAM
            }
            Self::WriteOutputFailed { .. } => TriageExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr, followed by its chain of causes.
    pub fn display_to_stderr(&self) {
        let mut next_error = match self {
            Self::CurrentDirFailed { err } => {
                error!("could not determine the current directory");
                Some(err as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { path } => {
                error!("current directory `{}` is not valid UTF-8", path.display());
                None
            }
            Self::ConfigParseError { err } => {
                error!("{err}");
                err.source()
            }
            Self::InputOpenFailed { path, err } => {
                error!("failed to open input file `{path}`");
                Some(err as &dyn Error)
            }
            Self::InputReadFailed { err } => {
                error!("failed to read input");
                Some(err as &dyn Error)
            }
            Self::EventParseError { err } => {
                error!("{err}");
                err.source()
            }
            Self::UnclassifiableResult { err } => {
                error!("{err}");
                None
            }
            Self::WriteOutputFailed { err } => {
                error!("failed to write report to stdout");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_event_error_exit_codes() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let error = ExpectedError::from(WriteEventError::Io(io_error));
        assert_eq!(error.process_exit_code(), TriageExitCode::WRITE_OUTPUT_ERROR);

        let error = ExpectedError::InputReadFailed {
            err: std::io::Error::other("boom"),
        };
        assert_eq!(error.process_exit_code(), TriageExitCode::SETUP_ERROR);
    }
}
