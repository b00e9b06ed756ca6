//! Validation of an interpreter run against a fixture's expectations.
//!
//! [`validate`] is a pure function: it spawns nothing, mutates nothing it is
//! given, and reports every mismatch it finds as a free-text failure in a
//! [`FailureReport`]. An empty report is the sole success condition.
//!
//! Compile errors and the runtime error are validated asymmetrically. Compile
//! errors form an order-independent set: every stderr line matching the
//! syntax-error shape must be expected, and every expected error must appear.
//! The runtime error is a single message that must open stderr (after any
//! tolerated cascaded compile errors), followed by a stack trace whose first
//! `[line N]` frame must name the expected line.

use std::collections::BTreeSet;

use crate::expectations::{ExpectationSet, OutputExpectation, RuntimeErrorExpectation};
use crate::expectations::{STACK_TRACE, SYNTAX_ERROR};

/// Cap on individually reported stderr surprises; the rest collapse into a
/// single truncation summary.
const MAX_REPORTED_STDERR: usize = 10;

/// The observable result of one interpreter process: exit code and fully
/// drained output streams, still undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Ordered failure messages accumulated while validating one fixture run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureReport {
    failures: Vec<String>,
}

impl FailureReport {
    pub fn is_pass(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// A report carrying one failure that precedes validation, e.g. a
    /// fixture that could not be read or an interpreter that failed to spawn.
    pub fn single(message: impl Into<String>) -> Self {
        FailureReport {
            failures: vec![message.into()],
        }
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.failures.push(message.into());
    }
}

/// Compares a fixture's expectations against the actual process result.
///
/// A fixture expecting both compile errors and a runtime error is a harness
/// contradiction, reported as a single failure with no further validation.
/// Otherwise exactly one of the two error branches runs, and the exit-code
/// and stdout checks always run afterwards.
pub fn validate(expected: &ExpectationSet, result: &RunResult) -> FailureReport {
    let mut report = FailureReport::default();

    if !expected.compile_errors.is_empty() && expected.runtime_error.is_some() {
        report.fail("Test error: Cannot expect both compile and runtime errors.");
        return report;
    }

    let stdout = decode_stream(&result.stdout, "stdout", &mut report);
    let stderr = decode_stream(&result.stderr, "stderr", &mut report);
    let error_lines: Vec<&str> = stderr.split('\n').collect();

    match &expected.runtime_error {
        Some(runtime_error) => validate_runtime_error(runtime_error, &error_lines, &mut report),
        None => validate_compile_errors(&expected.compile_errors, &error_lines, &mut report),
    }

    validate_exit_code(expected.exit_code, result.exit_code, &error_lines, &mut report);
    validate_output(&expected.output, &stdout, &mut report);

    report
}

/// Decodes a raw stream with line-ending normalization. A decode failure is
/// recorded as a failure and validation continues with lossy text.
fn decode_stream(bytes: &[u8], stream: &str, report: &mut FailureReport) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.replace("\r\n", "\n"),
        Err(error) => {
            report.fail(format!("Error decoding {stream} as UTF-8: {error}."));
            String::from_utf8_lossy(bytes).replace("\r\n", "\n")
        }
    }
}

fn validate_runtime_error(
    expected: &RuntimeErrorExpectation,
    error_lines: &[&str],
    report: &mut FailureReport,
) {
    if error_lines.len() < 2 {
        report.fail(format!(
            "Expected runtime error \"{}\" and got none.",
            expected.message
        ));
        return;
    }

    // Skip any compile errors ahead of the runtime error. This can happen
    // when a module loaded by the fixture under test fails to compile.
    let mut index = 0;
    while index < error_lines.len() && SYNTAX_ERROR.is_match(error_lines[index]) {
        index += 1;
    }

    let message_line = error_lines.get(index).copied().unwrap_or("");
    if message_line != expected.message {
        report.fail(format!(
            "Expected runtime error \"{}\" and got:",
            expected.message
        ));
        report.fail(message_line);
    }

    // The stack trace must attribute the error to the expected line. Frames
    // between the message and the first `[line N]` frame come from builtin
    // libraries and are not checked.
    let trace_start = (index + 1).min(error_lines.len());
    let trace_lines = &error_lines[trace_start..];
    let frame = trace_lines
        .iter()
        .find_map(|line| STACK_TRACE.captures(line));

    match frame {
        None => {
            report.fail("Expected stack trace with line numbers and got:");
            for line in trace_lines {
                report.fail(*line);
            }
        }
        Some(captures) => {
            let trace_line: u32 = captures[1].parse().unwrap_or(0);
            if trace_line != expected.line {
                report.fail(format!(
                    "Expected runtime error on line {} but was on line {}.",
                    expected.line, trace_line
                ));
            }
        }
    }
}

fn validate_compile_errors(
    expected: &BTreeSet<String>,
    error_lines: &[&str],
    report: &mut FailureReport,
) {
    let mut found = BTreeSet::new();
    let mut unexpected = 0usize;

    for line in error_lines {
        if let Some(captures) = SYNTAX_ERROR.captures(line) {
            let error = format!("[line {}] {}", &captures[1], &captures[2]);
            if expected.contains(&error) {
                found.insert(error);
            } else {
                if unexpected < MAX_REPORTED_STDERR {
                    report.fail("Unexpected compile error:");
                    report.fail(*line);
                }
                unexpected += 1;
            }
        } else if !line.is_empty() {
            if unexpected < MAX_REPORTED_STDERR {
                report.fail("Unexpected output on stderr:");
                report.fail(*line);
            }
            unexpected += 1;
        }
    }

    if unexpected > MAX_REPORTED_STDERR {
        report.fail(format!(
            "(truncated {} more..)",
            unexpected - MAX_REPORTED_STDERR
        ));
    }

    for error in expected.difference(&found) {
        report.fail(format!("Missing expected compile error: {error}"));
    }
}

/// Checks the process exit code. On mismatch the first few stderr lines are
/// folded into the failure message as diagnostic context.
fn validate_exit_code(expected: i32, actual: i32, error_lines: &[&str], report: &mut FailureReport) {
    if actual == expected {
        return;
    }

    let mut context: Vec<&str> = error_lines
        .iter()
        .take(MAX_REPORTED_STDERR)
        .copied()
        .collect();
    if error_lines.len() > MAX_REPORTED_STDERR {
        context.push("(truncated..)");
    }
    report.fail(format!(
        "Expected exit code {expected} and got {actual}. Stderr:\n{}",
        context.join("\n")
    ));
}

/// Positionally compares actual stdout lines against the expected ones. All
/// mismatches are collected; nothing short-circuits.
fn validate_output(expected: &[OutputExpectation], stdout: &str, report: &mut FailureReport) {
    let mut lines: Vec<&str> = stdout.split('\n').collect();
    // A final newline produces one trailing empty element; drop it.
    if lines.last() == Some(&"") {
        lines.pop();
    }

    for (index, line) in lines.iter().enumerate() {
        match expected.get(index) {
            None => report.fail(format!("Got output \"{line}\" when none was expected.")),
            Some(want) if want.text != *line => report.fail(format!(
                "Expected output \"{}\" on line {} and got \"{}\".",
                want.text, want.line, line
            )),
            Some(_) => {}
        }
    }

    for want in expected.iter().skip(lines.len()) {
        report.fail(format!(
            "Missing expected output \"{}\" on line {}.",
            want.text, want.line
        ));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::expectations::{parse_fixture, Parsed};
    use crate::suite::Language;

    fn expect(source: &str) -> ExpectationSet {
        match parse_fixture(source, Language::Go) {
            Parsed::Test(set) => set,
            Parsed::NotATest => panic!("fixture under test must not be a nontest"),
        }
    }

    fn run(exit_code: i32, stdout: &str, stderr: &str) -> RunResult {
        RunResult {
            exit_code,
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn zero_annotations_assert_empty_output_and_exit_zero() {
        let set = ExpectationSet::default();
        assert!(validate(&set, &run(0, "", "")).is_pass());

        let report = validate(&set, &run(0, "surprise\n", ""));
        assert_eq!(
            report.failures(),
            ["Got output \"surprise\" when none was expected."]
        );

        let report = validate(&set, &run(1, "", ""));
        assert!(!report.is_pass());
    }

    #[test]
    fn single_output_expectation_passes() {
        let set = expect("var a;\nvar b;\nvar c;\nprint 3; // expect: 3\n");
        let report = validate(&set, &run(0, "3\n", ""));
        assert_eq!(report.failures(), [] as [&str; 0]);
    }

    #[test]
    fn output_comparison_is_order_sensitive() {
        let set = expect("print \"a\"; // expect: a\nprint \"b\"; // expect: b\n");
        let report = validate(&set, &run(0, "b\na\n", ""));
        assert_eq!(
            report.failures(),
            [
                "Expected output \"a\" on line 1 and got \"b\".",
                "Expected output \"b\" on line 2 and got \"a\".",
            ]
        );
    }

    #[test]
    fn missing_and_unexpected_output_are_both_reported() {
        let set = expect("print \"a\"; // expect: a\n");
        let report = validate(&set, &run(0, "", ""));
        assert_eq!(
            report.failures(),
            ["Missing expected output \"a\" on line 1."]
        );

        let report = validate(&set, &run(0, "a\nb\nc\n", ""));
        assert_eq!(
            report.failures(),
            [
                "Got output \"b\" when none was expected.",
                "Got output \"c\" when none was expected.",
            ]
        );
    }

    #[test]
    fn runtime_error_with_matching_trace_passes() {
        let set = expect("var a;\nprint x; // expect runtime error: Undefined variable 'x'.\n");
        let report = validate(&set, &run(70, "", "Undefined variable 'x'.\n[line 2] in script\n"));
        assert_eq!(report.failures(), [] as [&str; 0]);
    }

    #[test]
    fn runtime_error_with_wrong_exit_code_is_exactly_one_failure() {
        let set = expect("var a;\nprint x; // expect runtime error: Undefined variable 'x'.\n");
        let report = validate(&set, &run(0, "", "Undefined variable 'x'.\n[line 2] in script\n"));
        assert_eq!(report.failures().len(), 1);
        assert!(report.failures()[0].starts_with("Expected exit code 70 and got 0."));
    }

    #[test]
    fn runtime_error_tolerates_leading_cascaded_compile_errors() {
        let set = expect("var a;\nvar b;\nprint x; // expect runtime error: boom.\n");
        let stderr = "[line 1] Error at 'import': bad module.\nboom.\n[line 3] in script\n";
        let report = validate(&set, &run(70, "", stderr));
        assert_eq!(report.failures(), [] as [&str; 0]);
    }

    #[test]
    fn runtime_error_message_must_match_exactly() {
        let set = expect("print x; // expect runtime error: boom.\n");
        let report = validate(&set, &run(70, "", "almost boom.\n[line 1] in script\n"));
        assert_eq!(
            report.failures(),
            ["Expected runtime error \"boom.\" and got:", "almost boom."]
        );
    }

    #[test]
    fn runtime_error_with_empty_stderr_reports_none() {
        let set = expect("print x; // expect runtime error: boom.\n");
        let report = validate(&set, &run(70, "", ""));
        assert_eq!(
            report.failures(),
            ["Expected runtime error \"boom.\" and got none."]
        );
    }

    #[test]
    fn runtime_error_without_a_trace_lists_the_remaining_lines() {
        let set = expect("print x; // expect runtime error: boom.\n");
        let report = validate(&set, &run(70, "", "boom.\nno frames here\n"));
        assert_eq!(
            report.failures(),
            [
                "Expected stack trace with line numbers and got:",
                "no frames here",
                "",
            ]
        );
    }

    #[test]
    fn runtime_error_on_the_wrong_line_cites_both_lines() {
        let set = expect("var a;\nprint x; // expect runtime error: boom.\n");
        let report = validate(&set, &run(70, "", "boom.\n[line 5] in script\n"));
        assert_eq!(
            report.failures(),
            ["Expected runtime error on line 2 but was on line 5."]
        );
    }

    #[test]
    fn compile_error_set_comparison_is_order_independent() {
        let set = expect("bad a // Error at 'a': one.\nbad b // Error at 'b': two.\n");
        let stderr = "[line 2] Error at 'b': two.\n[line 1] Error at 'a': one.\n";
        let report = validate(&set, &run(65, "", stderr));
        assert_eq!(report.failures(), [] as [&str; 0]);
    }

    #[test]
    fn compile_error_with_column_number_still_matches() {
        let set = expect("bad a // Error at 'a': one.\n");
        let report = validate(&set, &run(65, "", "[line 1:7] Error at 'a': one.\n"));
        assert_eq!(report.failures(), [] as [&str; 0]);
    }

    #[test]
    fn missing_expected_compile_error_is_reported() {
        let set = expect("bad a // Error at 'a': one.\n");
        let report = validate(&set, &run(65, "", ""));
        assert_eq!(
            report.failures(),
            ["Missing expected compile error: [line 1] Error at 'a': one."]
        );
    }

    #[test]
    fn unexpected_stderr_output_is_reported() {
        let set = ExpectationSet::default();
        let report = validate(&set, &run(0, "", "stray warning\n"));
        assert_eq!(
            report.failures(),
            ["Unexpected output on stderr:", "stray warning"]
        );
    }

    #[test]
    fn unexpected_compile_errors_truncate_after_ten() {
        let set = ExpectationSet::default();
        let stderr: String = (1..=15)
            .map(|n| format!("[line {n}] Error at 'x': surprise.\n"))
            .collect();
        // Exit code 65 here would itself mismatch the derived 0; isolate the
        // truncation behavior by making the exit code agree.
        let report = validate(&set, &run(0, "", &stderr));
        let failures = report.failures();
        // Ten errors, two messages each, plus the truncation summary.
        assert_eq!(failures.len(), 21);
        assert_eq!(failures[0], "Unexpected compile error:");
        assert_eq!(failures[19], "[line 10] Error at 'x': surprise.");
        assert_eq!(failures[20], "(truncated 5 more..)");
    }

    #[test]
    fn contradictory_expectations_are_a_single_failure() {
        let set = expect("bad a // Error at 'a': one.\nprint x; // expect runtime error: boom.\n");
        let report = validate(&set, &run(70, "lots\nof\noutput\n", "noise\n"));
        assert_eq!(
            report.failures(),
            ["Test error: Cannot expect both compile and runtime errors."]
        );
    }

    #[test]
    fn exit_code_mismatch_attaches_stderr_context() {
        let set = ExpectationSet::default();
        let report = validate(&set, &run(65, "", ""));
        assert_eq!(report.failures().len(), 1);
        assert!(report.failures()[0].starts_with("Expected exit code 0 and got 65. Stderr:"));

        let stderr: String = (1..=12).map(|n| format!("line {n}\n")).collect();
        let report = validate(&set, &run(
            65,
            "",
            // Every stderr line here is also unexpected output; only check
            // the exit-code failure's truncation marker.
            &stderr,
        ));
        let exit_failure = report
            .failures()
            .iter()
            .find(|f| f.starts_with("Expected exit code"))
            .expect("exit code failure present");
        assert!(exit_failure.ends_with("(truncated..)"));
    }

    #[test]
    fn invalid_utf8_is_recorded_and_validation_continues() {
        let set = ExpectationSet::default();
        let result = RunResult {
            exit_code: 0,
            stdout: vec![0xff, 0xfe, b'\n'],
            stderr: Vec::new(),
        };
        let report = validate(&set, &result);
        assert!(!report.is_pass());
        assert!(report.failures()[0].starts_with("Error decoding stdout"));
    }

    #[test]
    fn validation_is_idempotent() {
        let set = expect("print 3; // expect: 4\n");
        let result = run(0, "3\n", "");
        assert_eq!(validate(&set, &result), validate(&set, &result));
    }
}
