//! User-facing output for the harness.
//!
//! Pass lines rewrite themselves in place on ANSI terminals so a healthy run
//! stays on one line; failures break out with their accumulated messages.
//! Colorization goes through `termcolor` and is skipped when stdout is not a
//! terminal.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::outcome::FailureReport;
use crate::runner::{FixtureRecord, FixtureStatus, RunSummary};

pub struct Reporter {
    stdout: StandardStream,
    ansi: bool,
}

impl Reporter {
    pub fn new() -> Self {
        Reporter {
            stdout: StandardStream::stdout(ColorChoice::Auto),
            ansi: atty::is(atty::Stream::Stdout),
        }
    }

    pub fn record(&mut self, record: &FixtureRecord) {
        match &record.status {
            FixtureStatus::Passed => self.status_line("PASS", Color::Green, &record.name),
            FixtureStatus::Failed(report) => self.failure(&record.name, report),
            FixtureStatus::Skipped => {}
            FixtureStatus::UnknownState => {
                self.clear_line();
                let _ = writeln!(
                    self.stdout,
                    "Unknown test state for \"{}\", skipping it.",
                    record.name
                );
            }
        }
    }

    pub fn summary(&mut self, summary: &RunSummary) {
        self.clear_line();
        let _ = writeln!(self.stdout);
        if summary.all_passed() {
            let _ = write!(self.stdout, "All ");
            self.colored(&summary.passed.to_string(), Color::Green, false);
            let _ = writeln!(
                self.stdout,
                " tests passed ({} expectations).",
                summary.expectations
            );
        } else {
            self.colored(&summary.passed.to_string(), Color::Green, false);
            let _ = write!(self.stdout, " tests passed. ");
            self.colored(&summary.failed.to_string(), Color::Red, false);
            let _ = writeln!(self.stdout, " tests failed.");
        }
    }

    fn failure(&mut self, name: &str, report: &FailureReport) {
        self.status_line("FAIL", Color::Red, name);
        let _ = writeln!(self.stdout);
        for failure in report.failures() {
            for line in failure.split('\n') {
                let _ = write!(self.stdout, "      ");
                // Bright red, so failure detail stands apart from the FAIL tag.
                self.colored(line, Color::Red, true);
                let _ = writeln!(self.stdout);
            }
        }
    }

    fn status_line(&mut self, label: &str, color: Color, name: &str) {
        self.clear_line();
        self.colored(label, color, false);
        let _ = write!(self.stdout, ": {name}");
        let _ = self.stdout.flush();
    }

    /// Erase the current line and return the cursor to its start, so the
    /// next status line overwrites this one. Falls back to a newline when
    /// not on an ANSI terminal.
    fn clear_line(&mut self) {
        if self.ansi {
            let _ = write!(self.stdout, "\x1b[2K\r");
        } else {
            let _ = writeln!(self.stdout);
        }
    }

    fn colored(&mut self, text: &str, color: Color, intense: bool) {
        let _ = self
            .stdout
            .set_color(ColorSpec::new().set_fg(Some(color)).set_intense(intense));
        let _ = write!(self.stdout, "{text}");
        let _ = self.stdout.reset();
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
