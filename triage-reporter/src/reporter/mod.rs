// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate the results of a test run and report them, most significant problems first.
//!
//! The main type here is [`Reporter`], which is constructed via a [`ReporterBuilder`].

mod aggregator;
mod displayer;
mod events;
mod helpers;
mod imp;
mod outcome;
pub mod ranking;

pub use aggregator::*;
pub use events::*;
pub use imp::*;
pub use outcome::*;
