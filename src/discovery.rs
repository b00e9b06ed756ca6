//! Fixture discovery.
//!
//! Recursively scans the fixture tree for `.lox` files. Benchmark fixtures
//! are measured, not asserted, so anything under a `benchmark` directory is
//! ignored. The result is sorted for deterministic execution order.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::HarnessError;

/// Recursively collects every fixture under `root`, sorted.
pub fn discover_fixtures<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, HarnessError> {
    let mut fixtures = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !is_fixture(path) {
            continue;
        }
        fixtures.push(path.to_path_buf());
    }
    fixtures.sort();
    Ok(fixtures)
}

/// Returns true for `.lox` files outside any `benchmark` directory.
pub fn is_fixture(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "lox")
        && !path
            .components()
            .any(|component| component.as_os_str() == "benchmark")
}
