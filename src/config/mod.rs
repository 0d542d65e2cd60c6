//! Scanner configuration: the builder, and the frozen [`Scanner`] it produces.
//!
//! A [`ScannerBuilder`] accumulates roots, filename filters and declaration
//! filters. `build()` validates everything once and hands back a read-only
//! `Scanner` that can be used for any number of scans, from any number of
//! threads.

use crate::cancellation::CancellationToken;
use crate::discovery::discover_files;
use crate::errors::Result;
use crate::filtering::{FilenameChain, ResolvedFilterSet};
use crate::output::ScanOutcome;
use crate::parser::DeclarationParser;
use crate::processing::aggregate;
use glob::Pattern;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::instrument;

pub use builder::ScannerBuilder;
mod builder;
mod parsing;
mod validation;

/// Walk-level settings of a built scanner.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Roots in the order they were added. Files and directories may be mixed.
    pub roots: Vec<PathBuf>,
    /// Whether to respect `.gitignore`, `.ignore` and hidden-file rules.
    pub use_gitignore: bool,
    /// Globs for files and directories to skip, matched below each root.
    pub ignore_globs: Vec<Pattern>,
    /// Whether to follow symbolic links during the walk.
    pub follow_links: bool,
    /// Whether to parse files in parallel.
    pub parallel: bool,
}

/// A configured, immutable scanner.
///
/// # Examples
///
/// ```
/// use defscan::config::ScannerBuilder;
/// use defscan::core_types::Category;
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// fs::write(dir.path().join("a.hh"), "<?hh\nclass Foo {}\n").unwrap();
/// fs::write(dir.path().join("b.hh"), "<?hh\nfunction bar(): void {}\n").unwrap();
///
/// let scanner = ScannerBuilder::new()
///     .add_path(dir.path())
///     .include(Category::Class)
///     .include_and_filter(Category::Function, |d| d.name().starts_with('b'))
///     .build()
///     .unwrap();
///
/// let outcome = scanner.scan().unwrap();
/// assert!(outcome.issues.is_empty());
/// let table = outcome.result.category_table();
/// assert!(table.class["Foo"].ends_with("a.hh"));
/// assert!(table.function["bar"].ends_with("b.hh"));
/// ```
#[derive(Debug)]
pub struct Scanner {
    config: ScanConfig,
    chain: FilenameChain,
    filters: ResolvedFilterSet,
    parser: Arc<dyn DeclarationParser>,
}

impl Scanner {
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// The filename chain, including the built-in filters appended by `build()`.
    pub fn chain(&self) -> &FilenameChain {
        &self.chain
    }

    pub fn filters(&self) -> &ResolvedFilterSet {
        &self.filters
    }

    pub fn parser(&self) -> &dyn DeclarationParser {
        self.parser.as_ref()
    }

    /// Runs a complete scan.
    ///
    /// Unavailable roots and unparseable files are reported in
    /// `ScanOutcome::issues`; they never make the scan fail.
    ///
    /// # Errors
    /// This only fails through [`Scanner::scan_with_token`]; a scan without
    /// a token always returns `Ok`.
    pub fn scan(&self) -> Result<ScanOutcome> {
        self.scan_with_token(&CancellationToken::new())
    }

    /// Runs a complete scan that stops early if `token` is cancelled.
    ///
    /// # Errors
    /// Returns `Error::Interrupted` if the token is cancelled before the scan finishes.
    #[instrument(level = "debug", skip_all, fields(roots = self.config.roots.len()))]
    pub fn scan_with_token(&self, token: &CancellationToken) -> Result<ScanOutcome> {
        let discovery = discover_files(&self.config, &self.chain, token)?;
        let mut issues = discovery.issues;

        let (result, parse_issues) = aggregate(
            discovery.files,
            self.parser.as_ref(),
            &self.filters,
            self.config.parallel,
            token,
        )?;
        issues.extend(parse_issues);

        info!(
            "Scanned {} file(s): {} declaration(s), {} issue(s)",
            result.scanned_files().len(),
            result.len(),
            issues.len()
        );
        Ok(ScanOutcome { result, issues })
    }
}

/// Represents the destination for the generated output.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum OutputDestination {
    /// Write to standard output.
    Stdout,
    /// Write to the specified file path.
    File(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_scanner_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Scanner>();
    }

    #[test]
    fn test_scanner_shared_across_threads() -> Result<()> {
        let dir = tempfile::tempdir().map_err(|e| crate::errors::io_error_with_path(e, "tempdir"))?;
        std::fs::write(dir.path().join("a.hh"), "<?hh\nclass Foo {}\n")
            .map_err(|e| crate::errors::io_error_with_path(e, "a.hh"))?;
        let scanner = Arc::new(
            ScannerBuilder::new()
                .add_path(dir.path())
                .include_all()
                .build()?,
        );

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let scanner = Arc::clone(&scanner);
                thread::spawn(move || scanner.scan().map(|o| o.result.len()))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap()?, 1);
        }
        Ok(())
    }
}
