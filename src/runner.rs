//! Per-fixture execution pipeline.
//!
//! For each discovered fixture: resolve its disposition against the suite's
//! override table, parse its expectations, invoke the interpreter, and
//! validate the process result. Everything a run needs travels in an explicit
//! [`RunContext`]; the only cross-fixture state is the [`RunSummary`]
//! counters. A fixture that fails to read or spawn becomes a failed record
//! rather than aborting the rest of the run.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::discovery;
use crate::expectations::parse_fixture;
use crate::outcome::validate;
use crate::prelude::*;

/// Everything one suite run needs, passed explicitly instead of read from
/// ambient state.
pub struct RunContext<'a> {
    pub suite: &'a Suite,
    /// Root of the interpreter checkout, containing `test/` and `build/`.
    pub root: PathBuf,
    /// Optional path prefix under `test/`; fixtures outside it do not run.
    pub filter: Option<String>,
}

impl RunContext<'_> {
    pub fn test_root(&self) -> PathBuf {
        self.root.join("test")
    }

    /// Whether the fixture survives the CLI filter.
    pub fn should_run(&self, fixture: &Path) -> bool {
        let Some(filter) = self.filter.as_deref() else {
            return true;
        };
        let rel = fixture
            .strip_prefix(self.test_root())
            .map(normalized)
            .unwrap_or_else(|_| normalized(fixture));
        rel.starts_with(filter)
    }

    /// The fixture's path relative to the root, `/`-separated. Used both as
    /// the override lookup key and as the reported name.
    pub fn fixture_name(&self, fixture: &Path) -> String {
        let rel = fixture.strip_prefix(&self.root).unwrap_or(fixture);
        normalized(rel)
    }
}

fn normalized(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Run-scoped counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub expectations: usize,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// What happened to one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureStatus {
    Passed,
    Failed(FailureReport),
    Skipped,
    /// The suite's override table says nothing about this fixture.
    UnknownState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureRecord {
    pub name: String,
    pub status: FixtureStatus,
}

/// Walks the fixture tree and runs every eligible fixture, reporting each
/// record to `observer` as it completes.
pub fn run_suite<F>(ctx: &RunContext, mut observer: F) -> Result<RunSummary, HarnessError>
where
    F: FnMut(&FixtureRecord),
{
    let mut summary = RunSummary::default();
    for fixture in discovery::discover_fixtures(ctx.test_root())? {
        if !ctx.should_run(&fixture) {
            continue;
        }
        if let Some(record) = run_fixture(ctx, &fixture, &mut summary) {
            observer(&record);
        }
    }
    Ok(summary)
}

/// Runs one fixture end to end. Returns `None` for `// nontest` files, which
/// are excluded from every count.
fn run_fixture(ctx: &RunContext, fixture: &Path, summary: &mut RunSummary) -> Option<FixtureRecord> {
    let name = ctx.fixture_name(fixture);

    let status = match ctx.suite.disposition(&name) {
        None => {
            summary.skipped += 1;
            FixtureStatus::UnknownState
        }
        Some(Disposition::Skip) => {
            summary.skipped += 1;
            FixtureStatus::Skipped
        }
        Some(Disposition::Pass) => match execute_fixture(ctx, fixture) {
            Ok(None) => return None,
            Ok(Some((expectations, report))) => {
                summary.expectations += expectations;
                if report.is_pass() {
                    summary.passed += 1;
                    FixtureStatus::Passed
                } else {
                    summary.failed += 1;
                    FixtureStatus::Failed(report)
                }
            }
            // Reading or spawning failed; fail the fixture, keep the run alive.
            Err(error) => {
                summary.failed += 1;
                FixtureStatus::Failed(FailureReport::single(harness_error_chain(&error)))
            }
        },
    };

    Some(FixtureRecord { name, status })
}

fn harness_error_chain(error: &HarnessError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    message
}

/// Parse, invoke, validate. `Ok(None)` means the file is not a test.
fn execute_fixture(
    ctx: &RunContext,
    fixture: &Path,
) -> Result<Option<(usize, FailureReport)>, HarnessError> {
    let source = fs::read_to_string(fixture).map_err(|source| HarnessError::ReadFixture {
        path: fixture.to_path_buf(),
        source,
    })?;

    let set = match parse_fixture(&source, ctx.suite.language) {
        Parsed::NotATest => return Ok(None),
        Parsed::Test(set) => set,
    };

    let result = invoke(ctx.suite, fixture)?;
    let report = validate(&set, &result);
    Ok(Some((set.expectations, report)))
}

/// Invokes the interpreter on one fixture: the suite's argument prefix with
/// the fixture path appended last. Waits for exit and drains both streams
/// fully before returning.
pub fn invoke(suite: &Suite, fixture: &Path) -> Result<RunResult, HarnessError> {
    let output = Command::new(&suite.program)
        .args(&suite.args)
        .arg(fixture)
        .output()
        .map_err(|source| HarnessError::Spawn {
            command: format!("{} {}", suite.program, suite.args.join(" ")),
            source,
        })?;

    Ok(RunResult {
        // A signal-terminated interpreter has no exit code; -1 can never
        // match an expected code.
        exit_code: output.status.code().unwrap_or(-1),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// Builds the Go interpreter the Go suites invoke. C builds are produced by
/// their own makefile and are expected to already exist.
pub fn build_interpreter(root: &Path) -> Result<(), HarnessError> {
    let status = Command::new("go")
        .args(["build", "-o", "./build/golox", "./cmd/cli/main.go"])
        .current_dir(root)
        .status()
        .map_err(|source| HarnessError::Spawn {
            command: "go build -o ./build/golox ./cmd/cli/main.go".to_string(),
            source,
        })?;

    if !status.success() {
        return Err(HarnessError::BuildFailed {
            code: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}

/// Whether the run needs [`build_interpreter`] first.
pub fn needs_build(suite: &Suite) -> bool {
    suite.language == Language::Go
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::suite::Disposition::{Pass, Skip};

    fn echo_suite(overrides: &[(&str, Disposition)]) -> Suite {
        Suite::new(
            "echo",
            Language::Go,
            "sh",
            &["-c", "echo ok"],
            overrides.iter().map(|(p, d)| (p.to_string(), *d)),
        )
    }

    #[test]
    fn filter_restricts_fixtures_by_prefix_under_the_test_root() {
        let suite = echo_suite(&[]);
        let ctx = RunContext {
            suite: &suite,
            root: PathBuf::from("/repo"),
            filter: Some("scanning".to_string()),
        };
        assert!(ctx.should_run(Path::new("/repo/test/scanning/numbers.lox")));
        assert!(!ctx.should_run(Path::new("/repo/test/class/empty.lox")));

        let ctx = RunContext {
            suite: &suite,
            root: PathBuf::from("/repo"),
            filter: None,
        };
        assert!(ctx.should_run(Path::new("/repo/test/class/empty.lox")));
    }

    #[test]
    fn fixture_name_is_root_relative_and_slash_separated() {
        let suite = echo_suite(&[]);
        let ctx = RunContext {
            suite: &suite,
            root: PathBuf::from("/repo"),
            filter: None,
        };
        assert_eq!(
            ctx.fixture_name(Path::new("/repo/test/if/else.lox")),
            "test/if/else.lox"
        );
    }

    #[test]
    fn invoke_appends_the_fixture_path_and_drains_output() {
        let suite = Suite::new(
            "echo",
            Language::Go,
            "echo",
            &["prefix"],
            Vec::<(String, Disposition)>::new(),
        );
        let result = invoke(&suite, Path::new("fixture.lox")).expect("echo spawns");
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, b"prefix fixture.lox\n");
        assert_eq!(result.stderr, b"");
    }

    #[test]
    fn run_suite_counts_passed_failed_skipped_and_ignores_nontests() {
        let root = std::env::temp_dir().join(format!("loxtest-runner-{}", std::process::id()));
        let test_dir = root.join("test");
        fs::create_dir_all(test_dir.join("skipped")).expect("create fixture tree");
        fs::write(test_dir.join("ok.lox"), "// expect: ok\n").expect("write fixture");
        fs::write(test_dir.join("bad.lox"), "// expect: nope\n").expect("write fixture");
        fs::write(test_dir.join("meta.lox"), "// nontest\n").expect("write fixture");
        fs::write(test_dir.join("skipped/x.lox"), "// expect: ok\n").expect("write fixture");

        let suite = echo_suite(&[("test", Pass), ("test/skipped", Skip)]);
        let ctx = RunContext {
            suite: &suite,
            root: root.clone(),
            filter: None,
        };

        let mut records = Vec::new();
        let summary = run_suite(&ctx, |record| records.push(record.clone())).expect("run");

        assert_eq!(
            summary,
            RunSummary {
                passed: 1,
                failed: 1,
                skipped: 1,
                expectations: 2,
            }
        );
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            ["test/bad.lox", "test/ok.lox", "test/skipped/x.lox"]
        );
        assert_eq!(records[1].status, FixtureStatus::Passed);
        assert!(matches!(records[0].status, FixtureStatus::Failed(_)));
        assert_eq!(records[2].status, FixtureStatus::Skipped);

        fs::remove_dir_all(&root).expect("clean up fixture tree");
    }

    #[test]
    fn missing_interpreter_fails_the_fixture_without_aborting() {
        let root = std::env::temp_dir().join(format!("loxtest-spawn-{}", std::process::id()));
        let test_dir = root.join("test");
        fs::create_dir_all(&test_dir).expect("create fixture tree");
        fs::write(test_dir.join("a.lox"), "// expect: ok\n").expect("write fixture");

        let suite = Suite::new(
            "missing",
            Language::Go,
            "./build/does-not-exist",
            &[],
            vec![("test", Pass)],
        );
        let ctx = RunContext {
            suite: &suite,
            root: root.clone(),
            filter: None,
        };

        let mut records = Vec::new();
        let summary = run_suite(&ctx, |record| records.push(record.clone())).expect("run");
        assert_eq!(summary.failed, 1);
        assert!(matches!(records[0].status, FixtureStatus::Failed(_)));

        fs::remove_dir_all(&root).expect("clean up fixture tree");
    }
}
