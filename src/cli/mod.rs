//! The harness command-line interface.
//!
//! Resolves the named suite from the builtin registry, builds the
//! interpreter when the suite needs it, runs the fixture tree, and reports
//! the summary. The process exits non-zero iff at least one fixture failed.

use clap::Parser;
use std::process;

use crate::cli::args::HarnessArgs;
use crate::cli::output::Reporter;
use crate::errors::HarnessError;
use crate::runner::{self, RunContext};
use crate::suite::builtin;

pub mod args;
pub mod output;

pub fn run() -> Result<(), HarnessError> {
    let args = HarnessArgs::parse();
    let suites = builtin::registry();

    if args.list_suites {
        for name in suites.keys() {
            println!("{name}");
        }
        return Ok(());
    }

    // clap guarantees the suite name is present past this point.
    let name = args.suite.unwrap_or_default();
    let suite = suites
        .get(&name)
        .ok_or_else(|| HarnessError::UnknownSuite(name.clone()))?;

    if runner::needs_build(suite) && !args.skip_build {
        runner::build_interpreter(&args.root)?;
    }

    let ctx = RunContext {
        suite,
        root: args.root,
        filter: args.filter,
    };

    let mut reporter = Reporter::new();
    let summary = runner::run_suite(&ctx, |record| reporter.record(record))?;
    reporter.summary(&summary);

    if !summary.all_passed() {
        process::exit(1);
    }
    Ok(())
}
