// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summarize a test run from its stream of events.
//!
//! `triage` reads JSON-lines test events, aggregates them and prints a report that puts the most
//! significant problems first. The reporting itself lives in the `triage-reporter` crate; this
//! crate is the command-line front end.

#![warn(missing_docs)]

mod dispatch;
mod errors;
pub mod exit_codes;
mod output;

#[doc(hidden)]
pub use dispatch::TriageApp;
#[doc(hidden)]
pub use errors::ExpectedError;
