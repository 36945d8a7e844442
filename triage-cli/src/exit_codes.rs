// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `triage` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum TriageExitCode {}

impl TriageExitCode {
    /// Every test passed or was skipped.
    pub const OK: i32 = 0;

    /// One or more tests failed or errored.
    pub const TESTS_FAILED: i32 = 100;

    /// A user issue happened while setting up a triage invocation, for example an invalid config
    /// file or an unreadable input.
    pub const SETUP_ERROR: i32 = 96;

    /// The event stream could not be decoded, or contained a result with no classifiable outcome.
    pub const INVALID_EVENT_STREAM: i32 = 106;

    /// Writing the report to stdout produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
