//! Suite configuration: which interpreter to invoke, under which language
//! tag, and which fixtures it is expected to handle.
//!
//! Every suite carries a pass/skip override table keyed by path prefix. A
//! fixture's disposition is decided by the most specific matching prefix:
//! the lookup walks the fixture's path components from the root down and the
//! last (longest) match wins. An unmatched fixture has no disposition and is
//! skipped with a diagnostic by the runner.

use std::collections::BTreeMap;

pub mod builtin;

/// The implementation family a suite targets, and the tag vocabulary of the
/// `// [<tag> line N]` annotation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Go,
    C,
    /// Appears only as an annotation tag. The Go interpreter mirrors the
    /// original Java implementation's error attribution, so `java`-tagged
    /// lines bind to Go targets.
    Java,
}

impl Language {
    /// Whether a tagged error line belongs to this target. Admitted when the
    /// tag is absent, names this target, or is the fixed legacy alias:
    /// `java` is accepted as equivalent to `go`.
    pub fn admits_tag(self, tag: Option<Language>) -> bool {
        match tag {
            None => true,
            Some(tag) if tag == self => true,
            Some(Language::Java) => self == Language::Go,
            Some(_) => false,
        }
    }
}

/// Whether a fixture subtree is expected to run under a suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Pass,
    Skip,
}

/// A named configuration binding an interpreter invocation to its expected
/// fixture coverage.
#[derive(Debug, Clone)]
pub struct Suite {
    pub name: String,
    pub language: Language,
    /// The interpreter executable, typically a path under `build/`.
    pub program: String,
    /// Fixed argument prefix; the fixture path is appended last.
    pub args: Vec<String>,
    overrides: BTreeMap<String, Disposition>,
}

impl Suite {
    pub fn new<S, P, I>(
        name: S,
        language: Language,
        program: S,
        args: &[&str],
        overrides: I,
    ) -> Self
    where
        S: Into<String>,
        P: Into<String>,
        I: IntoIterator<Item = (P, Disposition)>,
    {
        Suite {
            name: name.into(),
            language,
            program: program.into(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
            overrides: overrides
                .into_iter()
                .map(|(prefix, disposition)| (prefix.into(), disposition))
                .collect(),
        }
    }

    /// Resolves a fixture's disposition by most specific path prefix.
    ///
    /// `fixture_path` must be relative to the harness root and use `/`
    /// separators (e.g. `test/assignment/syntax.lox`). Returns `None` when no
    /// prefix in the override table matches.
    pub fn disposition(&self, fixture_path: &str) -> Option<Disposition> {
        let mut subpath = String::new();
        let mut resolved = None;
        for part in fixture_path.split('/') {
            if !subpath.is_empty() {
                subpath.push('/');
            }
            subpath.push_str(part);
            if let Some(disposition) = self.overrides.get(subpath.as_str()) {
                resolved = Some(*disposition);
            }
        }
        resolved
    }
}
