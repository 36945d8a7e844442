// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core functionality for triage, a test-run reporter that puts the most significant problems
//! first.
//!
//! A test engine feeds lifecycle events (run start, suite start and end, one record per finished
//! test) into a [`Reporter`](reporter::Reporter). The reporter aggregates them and, at the end of
//! the run, renders a summary. Once anything has failed or errored, sections about performance
//! and skipped tests are left out, and failures are clustered by source location instead.

#![warn(missing_docs)]

pub mod config;
pub mod errors;
mod helpers;
pub mod location;
pub mod reporter;
pub mod time;
