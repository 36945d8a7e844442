// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code for triage-reporter.

/// Utilities for pluralizing various words based on count.
pub mod plural {
    /// Returns "line" if `count` is 1, otherwise "lines".
    pub fn lines_str(count: usize) -> &'static str {
        if count == 1 { "line" } else { "lines" }
    }
}

/// Returns the message with surrounding whitespace removed, or `None` if nothing is left.
///
/// Engines commonly report an empty or whitespace-only message when an assertion has no custom
/// text. Such messages are treated as absent everywhere.
pub(crate) fn non_blank(message: &str) -> Option<&str> {
    let trimmed = message.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Returns the first non-blank line of the message, if any.
pub(crate) fn first_line(message: &str) -> Option<&str> {
    non_blank(message)?.lines().next().map(str::trim_end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        let tests: &[(&str, Option<&str>)] = &[
            ("", None),
            ("   ", None),
            ("\n\t \n", None),
            ("boom", Some("boom")),
            ("  boom \n", Some("boom")),
            ("\nexpected 1\n  got 2\n", Some("expected 1\n  got 2")),
        ];

        for (input, output) in tests {
            assert_eq!(non_blank(input), *output, "for input {input:?}");
        }
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line(""), None);
        assert_eq!(first_line(" \n "), None);
        assert_eq!(first_line("\n  expected 1 \ngot 2"), Some("expected 1"));
    }
}
