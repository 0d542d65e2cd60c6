//! `defscan` is a library and command-line tool that finds the top-level
//! declarations of a Hack/PHP source tree and maps each name to the file
//! that declares it.
//!
//! A scan runs in three stages:
//! 1.  **Discover**: walk the configured roots and keep the files accepted by
//!     the filename predicate chain.
//! 2.  **Aggregate**: parse each file once and keep the declarations accepted
//!     by the per-category filters.
//! 3.  **View**: derive the name-to-file map and the four-group autoload
//!     table from the result.
//!
//! Problems with individual roots or files never abort a scan; they are
//! returned as [`errors::ScanIssue`]s next to the result.
//!
//! # Example: Library Usage
//!
//! ```
//! use defscan::{Category, ScannerBuilder};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::write(
//!     dir.path().join("Foo.hh"),
//!     "<?hh\nnamespace App;\n\nfinal class Foo {}\nconst int LIMIT = 3;\n",
//! )
//! .unwrap();
//! fs::write(dir.path().join("README.md"), "# not scanned").unwrap();
//!
//! let scanner = ScannerBuilder::new()
//!     .add_path(dir.path())
//!     .extensions(vec!["hh".to_string()])
//!     .include(Category::Class)
//!     .include(Category::Constant)
//!     .build()
//!     .unwrap();
//!
//! let outcome = scanner.scan().unwrap();
//! assert_eq!(outcome.result.scanned_files().len(), 1);
//!
//! let table = outcome.result.category_table();
//! assert!(table.class["App\\Foo"].ends_with("Foo.hh"));
//! assert!(table.constant.contains_key("App\\LIMIT"));
//!
//! let mut json = Vec::new();
//! defscan::output::write_json(&outcome.result, &mut json).unwrap();
//! ```

pub mod cancellation;
pub mod cli;
pub mod config;
pub mod core_types;
pub mod discovery;
pub mod errors;
pub mod filtering;
pub mod output;
pub mod parser;
pub mod processing;
pub mod signal;

// Re-export key public types for easier use as a library
pub use cancellation::CancellationToken;
pub use cli::OutputFormat;
pub use config::{OutputDestination, ScanConfig, Scanner, ScannerBuilder};
pub use core_types::{AutoloadGroup, Category, Declaration, DeclarationSet, FilterCategory};
pub use output::{AutoloadTable, Collision, NameMap, ScanOutcome, ScanResult};
pub use parser::{DeclarationParser, HackParser};

use crate::errors::{io_error_with_path, Result, ScanIssue};
use std::io::Write;

/// Builds and runs a scanner in one call.
///
/// # Errors
/// Returns `Error::Config` if the builder is invalid.
pub fn scan(builder: ScannerBuilder) -> Result<ScanOutcome> {
    builder.build()?.scan()
}

/// Runs a scan and writes the result in `format` to `destination`.
///
/// This is the binary's entry point, exposed for embedding. The non-fatal
/// issues of the scan are returned for the caller to report.
///
/// # Errors
/// Returns `Error::Interrupted` if the token is cancelled, and `Error::Io` or
/// `Error::Serialization` if the output cannot be written.
pub fn run(
    scanner: &Scanner,
    format: OutputFormat,
    destination: &OutputDestination,
    token: &CancellationToken,
) -> Result<Vec<ScanIssue>> {
    let outcome = scanner.scan_with_token(token)?;

    for collision in outcome.result.collisions() {
        log::debug!(
            "'{}' is declared in both '{}' and '{}'; using the latter",
            collision.name,
            collision.discarded.display(),
            collision.winner.display()
        );
    }

    let mut writer = output::setup_output_writer(destination)?;
    match format {
        OutputFormat::Json => output::write_json(&outcome.result, &mut writer)?,
        OutputFormat::Names => output::write_name_map(&outcome.result, &mut writer)?,
    }
    writer
        .flush()
        .map_err(|e| io_error_with_path(e, "<output>"))?;

    Ok(outcome.issues)
}
