// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source locations and their normalization for display.
//!
//! Engines report absolute paths. Those are long and mostly redundant in a summary, so every path
//! shown to the user (or used as a clustering key) goes through a [`LocationNormalizer`] first.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fmt;

/// A line within a source file.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
pub struct SourceLocation {
    /// The path to the file, as reported by the engine.
    pub path: Utf8PathBuf,

    /// The 1-based line number.
    pub line: u32,
}

impl SourceLocation {
    /// Creates a new source location.
    pub fn new(path: impl Into<Utf8PathBuf>, line: u32) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

/// Maps absolute source paths to short, run-relative display paths.
///
/// The working directory is passed in at construction time rather than read from the process.
#[derive(Clone, Debug)]
pub struct LocationNormalizer {
    working_dir: Utf8PathBuf,
    test_root: Utf8PathBuf,
}

impl LocationNormalizer {
    /// The conventional name of the directory that holds tests.
    pub const DEFAULT_TEST_ROOT: &'static str = "test";

    /// Creates a new normalizer.
    ///
    /// `test_root` is a directory name relative to `working_dir`. Paths under it lose that prefix
    /// as well.
    pub fn new(working_dir: impl Into<Utf8PathBuf>, test_root: impl AsRef<Utf8Path>) -> Self {
        let working_dir = working_dir.into();
        let test_root = working_dir.join(test_root);
        Self {
            working_dir,
            test_root,
        }
    }

    /// Returns the working directory paths are made relative to.
    pub fn working_dir(&self) -> &Utf8Path {
        &self.working_dir
    }

    /// Normalizes a path for display.
    ///
    /// * Paths under `<working_dir>/<test_root>/` are returned relative to the test root.
    /// * Other paths under `<working_dir>/` are returned relative to the working directory.
    /// * Anything else, including paths that are already relative, is returned unchanged.
    ///
    /// Matching is done by path component. Since the working directory must be absolute for any
    /// prefix to be stripped, and stripped results are always relative, normalizing twice is the
    /// same as normalizing once.
    pub fn normalize<'a>(&self, path: &'a Utf8Path) -> &'a Utf8Path {
        if !self.working_dir.is_absolute() {
            return path;
        }

        [&self.test_root, &self.working_dir]
            .into_iter()
            .find_map(|prefix| {
                path.strip_prefix(prefix)
                    .ok()
                    .filter(|rest| !rest.as_str().is_empty())
            })
            .unwrap_or(path)
    }
}
