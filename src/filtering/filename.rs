// src/filtering/filename.rs

//! The filename predicate chain and the built-in filename filters that the
//! builder appends to it.

use super::extension::passes_extension_filters;
use super::predicate::{Predicate, PredicateList};
use glob::Pattern;
use log::trace;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;

/// Decides which discovered files get parsed.
///
/// A path is accepted only if every predicate in the chain accepts it. An
/// empty chain accepts everything.
///
/// # Examples
///
/// ```
/// use defscan::filtering::FilenameChain;
/// use std::path::Path;
///
/// let mut chain = FilenameChain::new();
/// assert!(chain.accepts(Path::new("/any/file")));
///
/// chain.push(|p: &Path| p.extension().map_or(false, |e| e == "hh"));
/// assert!(chain.accepts(Path::new("/src/Foo.hh")));
/// assert!(!chain.accepts(Path::new("/src/notes.txt")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilenameChain {
    predicates: PredicateList<Path>,
}

impl FilenameChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a predicate to the chain.
    pub fn push<F>(&mut self, predicate: F)
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(predicate);
    }

    pub(crate) fn push_shared(&mut self, predicate: Predicate<Path>) {
        self.predicates.push_shared(predicate);
    }

    /// Logical AND of every predicate in the chain.
    pub fn accepts(&self, path: &Path) -> bool {
        let accepted = self.predicates.all(path);
        trace!(
            "Filename chain {} '{}'",
            if accepted { "accepted" } else { "rejected" },
            path.display()
        );
        accepted
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Normalizes a path to a forward-slash string for regex and glob matching.
fn normalized(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Builds a predicate from include/exclude extension lists (lowercase).
pub fn extension_filter(
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
) -> Predicate<Path> {
    Arc::new(move |path: &Path| {
        passes_extension_filters(path, include.as_deref(), exclude.as_deref())
    })
}

/// Builds a predicate that requires the full path to match at least one regex.
pub fn path_regex_filter(regexes: Vec<Regex>) -> Predicate<Path> {
    Arc::new(move |path: &Path| {
        let path_str = normalized(path);
        regexes.iter().any(|re| re.is_match(&path_str))
    })
}

/// Builds a predicate that rejects any path matching one of the regexes.
pub fn exclude_path_regex_filter(regexes: Vec<Regex>) -> Predicate<Path> {
    Arc::new(move |path: &Path| {
        let path_str = normalized(path);
        !regexes.iter().any(|re| re.is_match(&path_str))
    })
}

/// Builds a predicate that requires the file name (basename) to match at least one regex.
///
/// A path without a file name component never matches.
pub fn filename_regex_filter(regexes: Vec<Regex>) -> Predicate<Path> {
    Arc::new(move |path: &Path| match path.file_name() {
        Some(name) => {
            let name = name.to_string_lossy();
            regexes.iter().any(|re| re.is_match(&name))
        }
        None => false,
    })
}

/// Whether a path, relative to the root it was found under, matches any ignore glob.
///
/// Patterns containing a `/` are matched against the whole relative path;
/// others are matched against its last component. The walker checks every
/// entry on the way down, so `vendor` skips everything under a `vendor/`
/// directory below the root but never a directory above it.
pub fn matches_ignore_glob(patterns: &[Pattern], relative: &Path) -> bool {
    patterns.iter().any(|glob| {
        if glob.as_str().contains('/') {
            glob.matches(&normalized(relative))
        } else {
            relative
                .file_name()
                .map_or(false, |name| glob.matches(&name.to_string_lossy()))
        }
    })
}
