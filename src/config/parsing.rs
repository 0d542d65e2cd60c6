// src/config/parsing.rs

use crate::errors::ConfigError;
use glob::Pattern;
use regex::Regex;

/// Compiles a vector of pattern strings into a vector of Regex objects.
pub(super) fn compile_regex_vec(
    patterns: Option<Vec<String>>,
    name: &str,
) -> Result<Option<Vec<Regex>>, ConfigError> {
    patterns
        .map(|vec| {
            vec.into_iter()
                .map(|p| {
                    Regex::new(&p).map_err(|source| ConfigError::InvalidRegex {
                        name: name.to_string(),
                        pattern: p,
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()
}

/// Compiles ignore glob patterns. Invalid patterns are an error, not skipped.
pub(super) fn compile_glob_vec(
    patterns: Option<Vec<String>>,
) -> Result<Option<Vec<Pattern>>, ConfigError> {
    patterns
        .map(|vec| {
            vec.into_iter()
                .map(|p| {
                    Pattern::new(&p)
                        .map_err(|source| ConfigError::InvalidGlob { pattern: p, source })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()
}

/// Normalizes a vector of extension strings to lowercase, dropping a leading dot.
pub(super) fn normalize_extensions(exts: Option<Vec<String>>) -> Option<Vec<String>> {
    exts.map(|v| {
        v.into_iter()
            .map(|s| s.trim_start_matches('.').to_lowercase())
            .collect()
    })
}
