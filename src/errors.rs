//! Harness-level error type.
//!
//! These errors cover the plumbing around a test run: reading fixtures,
//! walking the fixture tree, and spawning interpreter processes. Expectation
//! mismatches are never errors; they accumulate in a
//! [`crate::outcome::FailureReport`] instead, so one broken fixture cannot
//! abort the rest of the run.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("failed to read fixture '{}'", path.display())]
    ReadFixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk fixture directory")]
    Walk(#[from] walkdir::Error),

    #[error("failed to run '{command}'")]
    #[diagnostic(help("is the interpreter built? run without --skip-build to build it"))]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown test suite '{0}'")]
    #[diagnostic(help("run with --list-suites to see the registered suite names"))]
    UnknownSuite(String),

    #[error("interpreter build failed with exit code {code}")]
    BuildFailed { code: i32 },
}
