// src/discovery/roots.rs

use crate::errors::ScanIssue;
use crate::filtering::is_readable;
use std::fs;
use std::path::{Path, PathBuf};

/// A root that exists, is readable and has been canonicalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedRoot {
    pub path: PathBuf,
    pub is_file: bool,
}

/// Resolves a configured root to a canonical, readable location.
///
/// Anything else (missing, unreadable, or neither a file nor a directory)
/// becomes a `RootUnavailable` issue carrying the root as configured.
pub(crate) fn resolve_root(root: &Path) -> Result<ResolvedRoot, ScanIssue> {
    let unavailable = |reason: String| ScanIssue::RootUnavailable {
        path: root.to_path_buf(),
        reason,
    };

    let path = root
        .canonicalize()
        .map_err(|e| unavailable(format!("failed to resolve path: {}", e)))?;
    let metadata = fs::metadata(&path).map_err(|e| unavailable(e.to_string()))?;

    if !metadata.is_file() && !metadata.is_dir() {
        return Err(unavailable("not a regular file or directory".to_string()));
    }
    if !is_readable(&path) {
        return Err(unavailable("permission denied".to_string()));
    }

    Ok(ResolvedRoot {
        is_file: metadata.is_file(),
        path,
    })
}
