// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::outcome::Severity;
use owo_colors::Style;

/// The styles applied to report output.
///
/// The default value applies no styling at all, which is what tests compare against.
#[derive(Clone, Debug, Default)]
pub(super) struct Styles {
    pub(super) count: Style,
    pub(super) header: Style,
    pub(super) pass: Style,
    pub(super) skip: Style,
    pub(super) error: Style,
    pub(super) fail: Style,
    pub(super) location: Style,
}

impl Styles {
    pub(super) fn colorize(&mut self) {
        self.count = Style::new().bold();
        self.header = Style::new().bold();
        self.pass = Style::new().green().bold();
        self.skip = Style::new().yellow().bold();
        self.error = Style::new().magenta().bold();
        self.fail = Style::new().red().bold();
        self.location = Style::new().cyan();
    }

    pub(super) fn for_severity(&self, severity: Severity) -> Style {
        match severity {
            Severity::Pass => self.pass,
            Severity::Skip => self.skip,
            Severity::Error => self.error,
            Severity::Failure => self.fail,
        }
    }
}
