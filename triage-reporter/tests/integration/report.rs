// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::time::Duration;
use triage_reporter::{
    reporter::{FailureDetail, ReporterBuilder, ReporterEvent, ReporterOutput, Severity, TestResult},
    time::ManualClock,
};

fn finished(result: TestResult) -> Step {
    Step::Event(ReporterEvent::TestFinished { result })
}

fn mixed_run() -> Vec<Step> {
    vec![
        Step::Event(ReporterEvent::RunStarted),
        Step::suite_started("lexer"),
        finished(
            TestResult::passed("lexer", "tokens", at("test/lexer_test.rs", 5))
                .with_duration(Duration::from_millis(300))
                .with_assertions(4),
        ),
        finished(
            TestResult::failed(
                "lexer",
                "unicode",
                at("test/lexer_test.rs", 12),
                assertion("expected 'é'\nfound 'e'", at("src/lexer.rs", 77)),
            )
            .with_duration(Duration::from_millis(100)),
        ),
        Step::Wait(Duration::from_secs(1)),
        Step::suite_finished("lexer"),
        Step::suite_started("parser"),
        finished(
            TestResult::errored(
                "parser",
                "nested",
                at("test/parser_test.rs", 30),
                FailureDetail::new("StackOverflow", "recursion too deep", at("src/parser.rs", 120)),
            )
            .with_duration(Duration::from_millis(50)),
        ),
        finished(
            TestResult::failed(
                "parser",
                "empty",
                at("test/parser_test.rs", 8),
                assertion("expected Some", at("src/lexer.rs", 90)),
            )
            .with_duration(Duration::from_millis(20)),
        ),
        finished(TestResult::skipped(
            "parser",
            "later",
            at("test/parser_test.rs", 44),
            None,
        )),
        Step::Wait(Duration::from_secs(1)),
        Step::suite_finished("parser"),
        Step::Event(ReporterEvent::RunFinished),
    ]
}

#[test]
fn mixed_run_puts_problems_first() {
    let clock = ManualClock::new();
    let mut out = String::new();
    let mut reporter = ReporterBuilder::new(WORKING_DIR)
        .build(ReporterOutput::Buffer(&mut out), Box::new(clock.clone()));

    let status = play(&mut reporter, &clock, mixed_run());
    let totals = *reporter.totals();
    drop(reporter);

    assert_eq!(status, Some(Severity::Failure));
    assert_eq!(
        (totals.tests, totals.passes, totals.failures, totals.errors, totals.skips),
        (5, 1, 2, 1, 1)
    );
    insta::assert_snapshot!(out, @r#"
            FAIL [   0.100s] lexer::unicode
        AssertionError: expected 'é'
        found 'e'

           ERROR [   0.050s] parser::nested
        StackOverflow: recursion too deep

            FAIL [   0.020s] parser::empty
        AssertionError: expected Some

            FAIL 2 failures. 1 errors. 1 skips. 5 tests & 4 assertions
        Finished in 2.000s, 2.50 tests/s, 2.00 assertions/s

    Top problem test locations:
      parser_test.rs: 2 (lines 30, 8)

    Top problem code locations:
      src/lexer.rs: 2, e.g. "expected 'é'"
    "#);
}

#[test]
fn passing_run_decoded_from_json_lines() {
    let input = indoc! {r#"
        {"event":"run-started"}
        {"event":"suite-started","suite":"db"}
        {"event":"test-finished","result":{"suite":"db","name":"connects","passed":true,"duration":0.7,"assertions":1,"location":{"path":"/work/app/test/db_test.rs","line":4}}}
        {"event":"test-finished","result":{"suite":"db","name":"migrates","passed":true,"duration":1.2,"assertions":1,"location":{"path":"/work/app/test/db_test.rs","line":11}}}
        WAIT 3000
        {"event":"suite-finished","suite":"db"}
        {"event":"suite-started","suite":"cache"}
        {"event":"test-finished","result":{"suite":"cache","name":"evicts","passed":true,"duration":0.2,"assertions":1,"location":{"path":"/work/app/test/cache_test.rs","line":7}}}
        WAIT 500
        {"event":"suite-finished","suite":"cache"}
        {"event":"run-finished"}
    "#};

    // Lines starting with WAIT advance the clock by that many milliseconds.
    let steps: Vec<_> = input
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line.strip_prefix("WAIT ") {
            Some(millis) => Some(Step::Wait(Duration::from_millis(
                millis.parse().expect("valid millis"),
            ))),
            None => ReporterEvent::from_json_line(line, index + 1)
                .expect("valid event")
                .map(Step::Event),
        })
        .collect();

    let clock = ManualClock::new();
    let mut out = String::new();
    let mut reporter = ReporterBuilder::new(WORKING_DIR)
        .build(ReporterOutput::Buffer(&mut out), Box::new(clock.clone()));
    let status = play(&mut reporter, &clock, steps);
    drop(reporter);

    assert_eq!(status, Some(Severity::Pass));
    insta::assert_snapshot!(out, @r"
            PASS 3 tests & 3 assertions
        Finished in 3.500s, 0.86 tests/s, 0.86 assertions/s

    Slowest tests:
      [   1.200s] db::migrates
      [   0.700s] db::connects

    Slowest suites:
      [   3.000s] db
    ");
}

#[test]
fn verbose_fast_fail_with_locations() {
    let clock = ManualClock::new();
    let mut out = String::new();
    let mut reporter = ReporterBuilder::new(WORKING_DIR)
        .set_verbose(true)
        .set_fast_fail(true)
        .set_show_location(true)
        .set_rerun_command(Some("cargo test --".to_owned()))
        .build(ReporterOutput::Buffer(&mut out), Box::new(clock.clone()));

    let status = play(&mut reporter, &clock, mixed_run());
    drop(reporter);

    assert_eq!(status, Some(Severity::Failure));
    let expected = concat!(
        "        PASS [   0.300s] lexer::tokens (lexer_test.rs:5)\n",
        "        FAIL [   0.100s] lexer::unicode (lexer_test.rs:12)\n",
        "    AssertionError: expected 'é'\n",
        "    found 'e'\n",
        "    at src/lexer.rs:77\n",
        "    rerun: cargo test -- lexer_test.rs:12\n",
        "\n",
        "       ERROR [   0.050s] parser::nested (parser_test.rs:30)\n",
        "    StackOverflow: recursion too deep\n",
        "    at src/parser.rs:120\n",
        "    rerun: cargo test -- parser_test.rs:30\n",
        "\n",
        "        FAIL [   0.020s] parser::empty (parser_test.rs:8)\n",
        "    AssertionError: expected Some\n",
        "    at src/lexer.rs:90\n",
        "    rerun: cargo test -- parser_test.rs:8\n",
        "\n",
        "        SKIP [   0.000s] parser::later (parser_test.rs:44)\n",
        "        FAIL 2 failures. 1 errors. 1 skips. 5 tests & 4 assertions\n",
    );
    assert!(out.starts_with(expected), "unexpected output:\n{out}");
}

#[test]
fn colorized_output_uses_ansi_styles() {
    let clock = ManualClock::new();
    let mut plain = String::new();
    let mut colored = String::new();

    let mut builder = ReporterBuilder::new(WORKING_DIR);
    let mut reporter = builder.build(ReporterOutput::Buffer(&mut plain), Box::new(clock.clone()));
    play(&mut reporter, &clock, mixed_run());
    drop(reporter);

    let clock = ManualClock::new();
    let mut reporter = builder
        .set_colorize(true)
        .build(ReporterOutput::Buffer(&mut colored), Box::new(clock.clone()));
    play(&mut reporter, &clock, mixed_run());
    drop(reporter);

    assert!(!plain.contains('\u{1b}'), "plain output has escapes:\n{plain}");
    assert!(colored.contains('\u{1b}'), "colored output has no escapes:\n{colored}");
    assert_ne!(plain, colored);
}

#[test]
fn truncated_run_reports_on_demand() {
    let clock = ManualClock::new();
    let mut out = String::new();
    let mut reporter = ReporterBuilder::new(WORKING_DIR)
        .build(ReporterOutput::Buffer(&mut out), Box::new(clock.clone()));

    // No run-started event: the first result starts the run.
    let status = play(
        &mut reporter,
        &clock,
        [
            finished(TestResult::skipped("net", "a", at("test/net_test.rs", 4), None)),
            Step::Wait(Duration::from_secs(1)),
        ],
    );
    assert_eq!(status, None);

    let status = reporter.on_run_report().expect("report is written");
    drop(reporter);

    assert_eq!(status, Severity::Skip);
    assert_eq!(
        out,
        concat!(
            "        SKIP 1 skips. 1 tests & 0 assertions\n",
            "    Finished in 1.000s, 1.00 tests/s, 0.00 assertions/s\n",
        )
    );
}
