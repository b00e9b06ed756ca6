//! Command-line arguments for the harness.
//!
//! Uses `clap` with its derive feature for a declarative, type-safe argument
//! surface.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "loxtest",
    version,
    about = "Conformance test harness for the Lox interpreter family."
)]
pub struct HarnessArgs {
    /// Name of the registered suite to run.
    #[arg(required_unless_present = "list_suites")]
    pub suite: Option<String>,

    /// Only run fixtures whose path under test/ starts with this prefix.
    pub filter: Option<String>,

    /// Print the registered suite names and exit.
    #[arg(long)]
    pub list_suites: bool,

    /// Run against the existing interpreter build without rebuilding it.
    #[arg(long)]
    pub skip_build: bool,

    /// Root of the interpreter checkout, containing test/ and build/.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}
