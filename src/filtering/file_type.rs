// src/filtering/file_type.rs

use std::fs::{File, Metadata};
use std::path::Path;

/// Checks if the metadata belongs to a regular file.
#[inline]
pub(crate) fn is_file_type(metadata: &Metadata) -> bool {
    metadata.is_file()
}

/// Checks whether the current process can open `path` for reading.
///
/// For directories this opens the directory handle, which on Unix fails
/// exactly when the directory cannot be listed.
pub(crate) fn is_readable(path: &Path) -> bool {
    if path.is_dir() {
        return std::fs::read_dir(path).is_ok();
    }
    File::open(path).is_ok()
}
