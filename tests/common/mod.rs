// tests/common/mod.rs

#![allow(dead_code)] // Each test binary uses a different subset of these helpers.

use defscan::core_types::{Category, DeclarationSet};
use defscan::errors::ParseError;
use defscan::ScannerBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

// Helper function to get the binary command
pub fn defscan_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("defscan"))
}

/// A temporary source tree for a single test.
pub struct TestHarness {
    _temp_dir: TempDir,
    pub root: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = tempdir().unwrap();
        // Canonical so expectations compare equal to what discovery reports.
        let root = temp_dir.path().canonicalize().unwrap();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Creates a file (and its parent directories) under the harness root.
    pub fn file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        fs::create_dir_all(full_path.parent().unwrap()).unwrap();
        fs::write(&full_path, content).unwrap();
        full_path
    }

    pub fn path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// A builder whose only root is the harness root.
    pub fn builder(&self) -> ScannerBuilder {
        ScannerBuilder::new().add_path(&self.root)
    }
}

/// A line-based fixture parser: each non-empty line is `<category> <name>`,
/// and a line `!error` makes the whole file fail.
pub fn fixture_parser(path: &Path) -> Result<DeclarationSet, ParseError> {
    let content = fs::read_to_string(path).map_err(|e| ParseError::other(path, e.to_string()))?;
    let mut set = DeclarationSet::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line == "!error" {
            return Err(ParseError::other(path, "fixture error"));
        }
        let (category, name) = line
            .split_once(' ')
            .ok_or_else(|| ParseError::other(path, format!("bad fixture line '{}'", line)))?;
        let category: Category = category.parse().map_err(|e: String| ParseError::other(path, e))?;
        set = set.with(category, name, path);
    }
    Ok(set)
}
