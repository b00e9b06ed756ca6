//! Expectation parsing for fixture files.
//!
//! A fixture declares its expected behavior through inline comments. Each
//! recognized annotation form has its own pattern, matched independently per
//! line, so a single line may carry more than one annotation. Matching a line
//! yields typed [`Annotation`] events; folding the events over the whole file
//! produces an [`ExpectationSet`], or the [`Parsed::NotATest`] sentinel when
//! the `// nontest` marker is found.
//!
//! Recognized forms:
//! - `// expect: <text>` — one expected stdout line (text may be empty).
//! - `// Error <text>` — an expected compile error, formatted with the line
//!   it appears on; forces exit code 65.
//! - `// [<tag> line N] Error <text>` — an expected compile error with an
//!   explicit line, admitted only when the tag matches the current target.
//!   Interpreters legitimately disagree on which line a cascaded parse error
//!   lands on after the first error, so a fixture can pin per-target lines.
//! - `// expect runtime error: <text>` — the single expected runtime error;
//!   forces exit code 70.
//! - `// nontest` — the file is not a test at all.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::suite::Language;

static EXPECTED_OUTPUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"// expect: ?(.*)").unwrap());
static EXPECTED_ERROR: Lazy<Regex> = Lazy::new(|| Regex::new(r"// (Error.*)").unwrap());
static ERROR_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"// \[((java|c) )?line (\d+)\] (Error.*)").unwrap());
static EXPECTED_RUNTIME_ERROR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"// expect runtime error: (.+)").unwrap());
static NON_TEST: Lazy<Regex> = Lazy::new(|| Regex::new(r"// nontest").unwrap());

/// Matches a compile error as interpreters print it to stderr, with an
/// optional column number that is matched but not captured.
pub static SYNTAX_ERROR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*line (\d+)(?::\d+)?\] (Error.+)").unwrap());

/// Matches a stack trace frame as interpreters print it to stderr.
pub static STACK_TRACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[line (\d+)\]").unwrap());

/// One annotation event extracted from a fixture line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Output(String),
    CompileError(String),
    ErrorLine {
        tag: Option<Language>,
        line: u32,
        message: String,
    },
    RuntimeError(String),
    NonTest,
}

/// Matches every annotation form against one line, in declaration order.
pub fn scan_line(line: &str) -> Vec<Annotation> {
    let mut annotations = Vec::new();

    if let Some(captures) = EXPECTED_OUTPUT.captures(line) {
        annotations.push(Annotation::Output(captures[1].to_string()));
    }
    if let Some(captures) = EXPECTED_ERROR.captures(line) {
        annotations.push(Annotation::CompileError(captures[1].to_string()));
    }
    if let Some(captures) = ERROR_LINE.captures(line) {
        let tag = captures.get(2).map(|tag| match tag.as_str() {
            "java" => Language::Java,
            _ => Language::C,
        });
        // The pattern only admits digits, so this cannot fail short of overflow.
        let line_number = captures[3].parse().unwrap_or(0);
        annotations.push(Annotation::ErrorLine {
            tag,
            line: line_number,
            message: captures[4].to_string(),
        });
    }
    if let Some(captures) = EXPECTED_RUNTIME_ERROR.captures(line) {
        annotations.push(Annotation::RuntimeError(captures[1].to_string()));
    }
    if NON_TEST.is_match(line) {
        annotations.push(Annotation::NonTest);
    }

    annotations
}

/// An expected stdout line and the 1-based fixture line it was declared on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputExpectation {
    pub text: String,
    pub line: u32,
}

/// The single expected runtime error: its message and the fixture line the
/// stack trace must point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeErrorExpectation {
    pub line: u32,
    pub message: String,
}

/// Everything a fixture asserts about a run. Owned by a single test run and
/// never mutated after parsing completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectationSet {
    /// Expected stdout lines, in appearance order. Compared positionally.
    pub output: Vec<OutputExpectation>,
    /// Expected compile errors as fully formatted `[line N] <message>`
    /// strings. Order is irrelevant and duplicates collapse.
    pub compile_errors: BTreeSet<String>,
    /// The expected runtime error, if any. A later annotation overwrites an
    /// earlier one.
    pub runtime_error: Option<RuntimeErrorExpectation>,
    /// 0 by default, 65 once any compile error is recorded, 70 once a
    /// runtime error is recorded.
    pub exit_code: i32,
    /// Total annotations recorded, across all forms.
    pub expectations: usize,
}

/// Result of parsing a fixture: either a real test or the `// nontest`
/// sentinel. Not-a-test files are excluded from every count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Test(ExpectationSet),
    NotATest,
}

/// Scans a fixture's text in a single forward pass and folds its annotation
/// events into an [`ExpectationSet`].
///
/// Tagged error lines are admitted when the tag is absent, names the current
/// target, or is the legacy alias for it (see [`Language::admits_tag`]). The
/// `// nontest` marker aborts immediately regardless of what was already
/// accumulated.
pub fn parse_fixture(source: &str, language: Language) -> Parsed {
    let mut set = ExpectationSet::default();

    for (index, line) in source.lines().enumerate() {
        let line_number = index as u32 + 1;
        for annotation in scan_line(line) {
            match annotation {
                Annotation::Output(text) => {
                    set.output.push(OutputExpectation {
                        text,
                        line: line_number,
                    });
                    set.expectations += 1;
                }
                Annotation::CompileError(message) => {
                    set.compile_errors
                        .insert(format!("[line {line_number}] {message}"));
                    // A compile error means the interpreter exits with EX_DATAERR.
                    set.exit_code = 65;
                    set.expectations += 1;
                }
                Annotation::ErrorLine { tag, line, message } => {
                    if language.admits_tag(tag) {
                        set.compile_errors.insert(format!("[line {line}] {message}"));
                        set.exit_code = 65;
                        set.expectations += 1;
                    }
                }
                Annotation::RuntimeError(message) => {
                    set.runtime_error = Some(RuntimeErrorExpectation {
                        line: line_number,
                        message,
                    });
                    // A runtime error means the interpreter exits with EX_SOFTWARE.
                    set.exit_code = 70;
                    set.expectations += 1;
                }
                Annotation::NonTest => return Parsed::NotATest,
            }
        }
    }

    Parsed::Test(set)
}
