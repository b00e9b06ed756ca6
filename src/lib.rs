//! Conformance test harness for the Lox interpreter family.
//!
//! Fixtures are plain `.lox` source files annotated with inline comments that
//! encode the expected stdout lines, expected compile errors, or a single
//! expected runtime error. The harness walks a fixture tree, decides per
//! fixture whether it should run against the selected interpreter build,
//! invokes the interpreter as a subprocess, and reconciles the actual exit
//! code and output streams against the parsed expectations.
//!
//! The pipeline per fixture:
//! 1. **Selection** ([`suite`]): the suite's pass/skip override table decides
//!    whether the fixture runs, most specific path prefix winning.
//! 2. **Parsing** ([`expectations`]): the fixture's comment stream is scanned
//!    once into an [`expectations::ExpectationSet`], or rejected outright by
//!    the `// nontest` marker.
//! 3. **Invocation** ([`runner`]): the interpreter runs with the suite's
//!    argument prefix plus the fixture path; stdout and stderr are fully
//!    drained before validation.
//! 4. **Validation** ([`outcome`]): a pure comparison of expectations against
//!    the process result, yielding a [`outcome::FailureReport`].

pub mod cli;
pub mod discovery;
pub mod errors;
pub mod expectations;
pub mod outcome;
pub mod runner;
pub mod suite;

pub mod prelude {
    pub use crate::errors::HarnessError;
    pub use crate::expectations::{ExpectationSet, Parsed, RuntimeErrorExpectation};
    pub use crate::outcome::{FailureReport, RunResult};
    pub use crate::runner::{RunContext, RunSummary};
    pub use crate::suite::{Disposition, Language, Suite};
}
