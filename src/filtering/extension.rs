// src/filtering/extension.rs

use std::path::Path;

/// Checks if a path passes include/exclude extension lists.
///
/// The filtering logic follows these rules in order:
///
/// 1.  **Exclusion Precedence:** If `exclude` is `Some` and contains the file's
///     extension, the function returns `false`.
/// 2.  **Inclusion Requirement:** If `include` is `Some`, the file must have an
///     extension, and that extension must be present in the include list.
/// 3.  **Default Pass:** Otherwise the function returns `true`.
///
/// Both lists are expected in lowercase; the path's extension is lowercased
/// before comparison.
///
/// # Examples
///
/// ```
/// use defscan::filtering::passes_extension_filters;
/// use std::path::Path;
///
/// let include = vec!["hh".to_string(), "php".to_string()];
/// let exclude = vec!["php".to_string()];
///
/// assert!(passes_extension_filters(Path::new("src/Foo.hh"), None, None));
/// assert!(passes_extension_filters(Path::new("src/Foo.HH"), Some(include.as_slice()), None));
/// assert!(!passes_extension_filters(Path::new("Makefile"), Some(include.as_slice()), None));
/// assert!(!passes_extension_filters(Path::new("index.php"), Some(include.as_slice()), Some(exclude.as_slice())));
/// ```
pub fn passes_extension_filters(
    path: &Path,
    include: Option<&[String]>,
    exclude: Option<&[String]>,
) -> bool {
    let extension = path
        .extension()
        .and_then(|os_str| os_str.to_str())
        .map(|s| s.to_lowercase());

    if let (Some(exclude_exts), Some(ext)) = (exclude, extension.as_ref()) {
        if exclude_exts.contains(ext) {
            return false;
        }
    }

    if let Some(include_exts) = include {
        match extension {
            Some(ref ext) if include_exts.contains(ext) => {}
            _ => return false,
        }
    }

    true
}
