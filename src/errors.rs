//! Defines the error and issue types used throughout `defscan`.
//!
//! Two families live here. `Error` is fatal and aborts an operation: bad
//! builder input, an interrupted scan, or a failed write of the final output.
//! `ScanIssue` is non-fatal: a scan always completes and returns its issues
//! alongside the result so batch runs are never cut short by one bad root or
//! one malformed file.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal errors returned by `defscan`.
#[derive(Error, Debug)]
pub enum Error {
    /// Error occurring while writing output or reading a path the caller asked for explicitly.
    #[error("I/O error accessing path '{path}': {source}")]
    Io {
        /// The path that caused the I/O error.
        path: String,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    /// The scanner builder was given an invalid option or option combination.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The scan was cancelled through its `CancellationToken`.
    #[error("Operation cancelled by user (Ctrl+C)")]
    Interrupted,

    /// The autoload table could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while validating a `ScannerBuilder`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An option was given a value it cannot accept.
    #[error("Invalid value for option '{option}': {reason}")]
    InvalidValue {
        /// The offending option.
        option: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Two options were given values that contradict each other.
    #[error("Option '{option1}' conflicts with '{option2}'")]
    Conflict {
        /// The first option involved.
        option1: String,
        /// The second option involved.
        option2: String,
    },

    /// A regular expression did not compile.
    #[error("Invalid {name} regex: '{pattern}'")]
    InvalidRegex {
        /// Which regex list the pattern came from ("path", "filename", ...).
        name: String,
        /// The pattern as supplied.
        pattern: String,
        /// The compiler error.
        #[source]
        source: regex::Error,
    },

    /// A glob pattern did not compile.
    #[error("Invalid glob pattern: '{pattern}'")]
    InvalidGlob {
        /// The pattern as supplied.
        pattern: String,
        /// The compiler error.
        #[source]
        source: glob::PatternError,
    },
}

/// Crate-wide result alias for fatal errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a file could not be parsed.
#[derive(Error, Debug)]
pub enum ParseErrorKind {
    /// The file could not be read.
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid UTF-8.
    #[error("file is not valid UTF-8")]
    NotUtf8,
    /// A closing brace had no opening partner, or a block was never closed.
    #[error("unbalanced braces near line {line}")]
    UnbalancedBraces {
        /// 1-based line where the imbalance was detected.
        line: usize,
    },
    /// A string literal, heredoc or block comment ran to the end of the file.
    #[error("unterminated literal or comment starting on line {line}")]
    UnterminatedLiteral {
        /// 1-based line where the literal started.
        line: usize,
    },
    /// A declaration keyword was not followed by an identifier.
    #[error("'{keyword}' without a name on line {line}")]
    MissingName {
        /// The keyword that introduced the declaration.
        keyword: String,
        /// 1-based line of the keyword.
        line: usize,
    },
    /// Free-form failure reported by a caller-supplied parser.
    #[error("{0}")]
    Other(String),
}

/// A parser failure for a single file.
#[derive(Error, Debug)]
#[error("Failed to parse '{}': {kind}", path.display())]
pub struct ParseError {
    /// The file that failed to parse.
    pub path: PathBuf,
    /// The underlying cause.
    #[source]
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Creates a `ParseError` for `path`.
    pub fn new(path: impl Into<PathBuf>, kind: ParseErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Convenience constructor for parsers that only have a message to report.
    pub fn other(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::new(path, ParseErrorKind::Other(message.into()))
    }
}

/// A non-fatal problem encountered during a scan.
///
/// Issues are collected in the order they occur and returned next to the
/// `ScanResult`; they never change what a successful part of the scan found.
#[derive(Debug)]
pub enum ScanIssue {
    /// A configured root is missing, unreadable, or neither a file nor a directory.
    RootUnavailable {
        /// The root exactly as configured.
        path: PathBuf,
        /// Human-readable reason.
        reason: String,
    },
    /// A candidate file could not be parsed and contributed no declarations.
    ParseFailure(ParseError),
}

impl ScanIssue {
    /// The path the issue concerns.
    pub fn path(&self) -> &Path {
        match self {
            ScanIssue::RootUnavailable { path, .. } => path,
            ScanIssue::ParseFailure(err) => &err.path,
        }
    }
}

impl fmt::Display for ScanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanIssue::RootUnavailable { path, reason } => {
                write!(f, "Root '{}' is unavailable: {}", path.display(), reason)
            }
            ScanIssue::ParseFailure(err) => write!(f, "{}", err),
        }
    }
}

/// Helper function to create an `Error::Io` with path context.
///
/// # Arguments
/// * `source` - The original `std::io::Error`.
/// * `path` - The path associated with the error.
pub fn io_error_with_path<P: AsRef<Path>>(source: std::io::Error, path: P) -> Error {
    Error::Io {
        path: path.as_ref().display().to_string(),
        source,
    }
}
