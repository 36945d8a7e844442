// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use camino_tempfile::tempdir;
use camino_tempfile_ext::prelude::*;
use indoc::indoc;
use std::time::Duration;
use triage_reporter::{
    config::{ColorChoice, ReporterConfig, TerminalContext},
    errors::ConfigParseErrorKind,
    reporter::{ReporterBuilder, ReporterEvent, ReporterOutput, Severity, TestResult},
    time::ManualClock,
};

#[test]
fn config_file_drives_reporter() {
    let temp_dir = tempdir().unwrap();
    let config_file = temp_dir.child("triage.toml");
    config_file
        .write_str(indoc! {r#"
            color = "never"
            exclude-singleton-skips = false
            detailed-skip = true
        "#})
        .unwrap();

    let config = ReporterConfig::from_sources(Some(&config_file.to_path_buf()))
        .expect("config is valid");
    assert_eq!(config.color, ColorChoice::Never);
    let should_colorize = config.color.should_colorize(&TerminalContext {
        is_terminal: true,
        term: Some("xterm-256color".to_owned()),
        emacs: None,
    });
    assert!(!should_colorize);

    let clock = ManualClock::new();
    let mut out = String::new();
    let mut reporter = ReporterBuilder::from_config(WORKING_DIR, &config, should_colorize)
        .build(ReporterOutput::Buffer(&mut out), Box::new(clock.clone()));

    let status = play(
        &mut reporter,
        &clock,
        [
            Step::Event(ReporterEvent::RunStarted),
            Step::Event(ReporterEvent::TestFinished {
                result: TestResult::skipped(
                    "fs",
                    "needs_root",
                    at("test/fs_test.rs", 3),
                    Some(assertion("requires root", at("test/fs_test.rs", 3))),
                ),
            }),
            Step::Wait(Duration::from_millis(250)),
            Step::Event(ReporterEvent::RunFinished),
        ],
    );
    drop(reporter);

    assert_eq!(status, Some(Severity::Skip));
    assert_eq!(
        out,
        concat!(
            "        SKIP [   0.000s] fs::needs_root\n",
            "    AssertionError: requires root\n",
            "\n",
            "        SKIP 1 skips. 1 tests & 0 assertions\n",
            "    Finished in 0.250s, 4.00 tests/s, 0.00 assertions/s\n",
            "\n",
            "Skipped test locations:\n",
            "  fs_test.rs: 1 (line 3)\n",
        )
    );
}

#[test]
fn invalid_config_file_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let config_file = temp_dir.child("triage.toml");
    config_file.write_str("fast-fail = \"sometimes\"\n").unwrap();

    let error = ReporterConfig::from_sources(Some(&config_file.to_path_buf()))
        .expect_err("fast-fail must be a boolean");
    assert!(
        matches!(error.kind(), ConfigParseErrorKind::DeserializeError(_)),
        "{error:?}"
    );
}
