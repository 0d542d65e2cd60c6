//! Handles the aggregation stage of a scan.
//!
//! Every discovered file is parsed once, each declaration is run through the
//! resolved filter of its category, and the survivors are merged into a
//! [`ScanResult`]. Parsing can run on the rayon pool; merging always follows
//! the discovery order so the result does not depend on scheduling.

use crate::cancellation::CancellationToken;
use crate::core_types::DeclarationSet;
use crate::errors::{Error, ParseError, Result, ScanIssue};
use crate::filtering::ResolvedFilterSet;
use crate::output::ScanResult;
use crate::parser::DeclarationParser;
use log::{debug, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Parses one file and keeps only the declarations the filters include.
fn parse_and_filter(
    path: &Path,
    parser: &dyn DeclarationParser,
    filters: &ResolvedFilterSet,
) -> std::result::Result<DeclarationSet, ParseError> {
    let parsed = parser.parse(path)?;
    let found = parsed.len();

    let mut kept = DeclarationSet::new();
    for (_, declarations) in parsed.into_categories() {
        for declaration in declarations {
            if filters.includes(&declaration) {
                kept.push(declaration);
            }
        }
    }
    debug!(
        "Parsed {}: kept {} of {} declaration(s)",
        path.display(),
        kept.len(),
        found
    );
    Ok(kept)
}

/// Parses, filters and merges the declarations of `files`.
///
/// `files` is the ordered output of discovery. Declarations are appended per
/// category in file order, then in the order the parser reported them. A
/// file that fails to parse contributes nothing and yields a
/// `ScanIssue::ParseFailure`; it still counts as scanned.
///
/// Predicates are called from worker threads when `parallel` is set; a
/// panicking predicate is not caught.
///
/// # Errors
/// Returns `Error::Interrupted` if the token is cancelled before every file is parsed.
pub fn aggregate(
    files: Vec<PathBuf>,
    parser: &dyn DeclarationParser,
    filters: &ResolvedFilterSet,
    parallel: bool,
    token: &CancellationToken,
) -> Result<(ScanResult, Vec<ScanIssue>)> {
    let parse = |path: &PathBuf| {
        if token.is_cancelled() {
            return None;
        }
        Some(parse_and_filter(path, parser, filters))
    };

    // Collecting preserves input order for both iterators.
    let outcomes: Vec<Option<_>> = if parallel {
        debug!("Parsing {} file(s) in parallel", files.len());
        files.par_iter().map(parse).collect()
    } else {
        files.iter().map(parse).collect()
    };

    if token.is_cancelled() || outcomes.iter().any(Option::is_none) {
        return Err(Error::Interrupted);
    }

    let mut result = ScanResult::new();
    let mut issues = Vec::new();
    for (path, outcome) in files.into_iter().zip(outcomes.into_iter().flatten()) {
        match outcome {
            Ok(set) => result.merge(set),
            Err(err) => {
                warn!("{}", err);
                issues.push(ScanIssue::ParseFailure(err));
            }
        }
        result.record_scanned(path);
    }

    Ok((result, issues))
}
