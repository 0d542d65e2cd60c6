// src/discovery/entry_processor.rs

use crate::filtering::{is_file_type, is_readable, FilenameChain};
use ignore::DirEntry;
use log::{debug, trace, warn};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Processes a single directory entry from the walk.
///
/// Walker errors (typically unreadable subdirectories) are logged and the
/// entry skipped, so one bad subtree never stops the walk.
///
/// Returns `Some(path)` for a readable regular file that passes the filename
/// chain, canonicalized when links are followed so the same file reached
/// through two links is only counted once.
pub(crate) fn process_direntry(
    entry_result: Result<DirEntry, ignore::Error>,
    chain: &FilenameChain,
    follow_links: bool,
) -> Option<PathBuf> {
    // --- 1. Handle Walker Errors ---
    let entry = match entry_result {
        Ok(entry) => entry,
        Err(ignore_error) => {
            warn!("Walker error: {}", ignore_error);
            return None;
        }
    };

    // --- 2. Filter by File Type ---
    let metadata = match entry.metadata() {
        Ok(md) => md,
        Err(e) => {
            warn!(
                "Skipping entry '{}' due to metadata error: {}",
                entry.path().display(),
                e
            );
            return None;
        }
    };
    if !is_file_type(&metadata) {
        trace!("Skipping non-file entry: {}", entry.path().display());
        return None;
    }

    // --- 3. Canonical path ---
    let path = if follow_links {
        match entry.path().canonicalize() {
            Ok(p) => p,
            Err(e) => {
                warn!("Skipping '{}': {}", entry.path().display(), e);
                return None;
            }
        }
    } else {
        entry.into_path()
    };

    accept_candidate(&path, chain).then_some(path)
}

/// Applies the readability check and the filename chain to a candidate file.
#[instrument(level = "debug", skip(chain), fields(path = %path.display()))]
pub(crate) fn accept_candidate(path: &Path, chain: &FilenameChain) -> bool {
    if !chain.accepts(path) {
        debug!("Skipping file rejected by filename chain: {}", path.display());
        return false;
    }
    if !is_readable(path) {
        warn!("Skipping unreadable file: {}", path.display());
        return false;
    }
    true
}
