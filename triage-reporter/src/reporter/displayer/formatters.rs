// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display helpers for durations, rates and run counts.

use crate::{
    helpers::plural,
    reporter::{aggregator::RunTotals, helpers::Styles},
};
use itertools::Itertools;
use owo_colors::OwoColorize;
use std::{fmt, time::Duration};
use swrite::{SWrite, swrite, swriteln};

pub(super) struct DisplayBracketedDuration(pub(super) Duration);

impl fmt::Display for DisplayBracketedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // * > means right-align.
        // * 8 is the number of characters to pad to.
        // * .3 means print three digits after the decimal point.
        write!(f, "[{:>8.3}s] ", self.0.as_secs_f64())
    }
}

/// A per-second rate, or `n/a` if no time has passed.
pub(super) struct DisplayRate {
    pub(super) count: u64,
    pub(super) elapsed: Duration,
}

impl fmt::Display for DisplayRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elapsed.is_zero() {
            return f.write_str("n/a");
        }
        write!(f, "{:.2}", self.count as f64 / self.elapsed.as_secs_f64())
    }
}

/// Displays `line 4` or `lines 4, 9`.
pub(super) struct DisplayLines<'a>(pub(super) &'a [u32]);

impl fmt::Display for DisplayLines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            plural::lines_str(self.0.len()),
            self.0.iter().join(", ")
        )
    }
}

pub(super) fn write_counts(totals: &RunTotals, styles: &Styles, writer: &mut String) {
    let status = totals.status();
    swrite!(
        writer,
        "{:>12} ",
        status.as_str().style(styles.for_severity(status))
    );

    for (count, what) in [
        (totals.failures, "failures"),
        (totals.errors, "errors"),
        (totals.skips, "skips"),
    ] {
        if count > 0 {
            swrite!(writer, "{} {what}. ", count.style(styles.count));
        }
    }

    let summary = format!("{} tests & {} assertions", totals.tests, totals.assertions);
    swriteln!(writer, "{}", summary.style(styles.for_severity(status)));
}

pub(super) fn write_performance(totals: &RunTotals, wall_time: Duration, writer: &mut String) {
    swriteln!(
        writer,
        "    Finished in {:.3}s, {} tests/s, {} assertions/s",
        wall_time.as_secs_f64(),
        DisplayRate {
            count: totals.tests as u64,
            elapsed: wall_time,
        },
        DisplayRate {
            count: totals.assertions,
            elapsed: wall_time,
        },
    );
}
