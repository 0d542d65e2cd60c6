// src/cli.rs

use crate::core_types::Category;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Scans Hack/PHP source trees for top-level declarations.
///
/// defscan walks the given roots, extracts classes, enums, interfaces,
/// traits, types, newtypes, functions and constants from every selected
/// file, and prints an autoload table mapping each name to the file that
/// declares it. When a name is declared twice, the file that sorts last wins.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directories to walk recursively and/or individual files to scan.
    #[arg(default_value = ".", value_name = "PATH")]
    pub roots: Vec<PathBuf>,

    // --- File Selection ---
    /// Include only files with these extensions (case-insensitive, repeatable).
    #[arg(short = 'e', long = "ext", value_name = "EXT", num_args = 1..)]
    pub extensions: Option<Vec<String>>,

    /// Exclude files with these extensions (case-insensitive, repeatable).
    #[arg(short = 'x', long = "exclude-ext", value_name = "EXT", num_args = 1..)]
    pub exclude_extensions: Option<Vec<String>>,

    /// Include only files whose full path matches any of these regexes.
    #[arg(short = 'r', long = "regex", value_name = "REGEX", num_args = 1..)]
    pub path_regex: Option<Vec<String>>,

    /// Exclude files whose full path matches any of these regexes.
    #[arg(short = 'X', long = "exclude-regex", value_name = "REGEX", num_args = 1..)]
    pub exclude_path_regex: Option<Vec<String>>,

    /// Include only files whose filename (basename) matches any of these regexes.
    #[arg(short = 'd', long = "filename-regex", value_name = "REGEX", num_args = 1..)]
    pub filename_regex: Option<Vec<String>>,

    /// Skip files and directories matching these glob patterns, relative to each root.
    /// A pattern without '/' matches any single path component below the root.
    #[arg(short = 'i', long = "ignore", value_name = "GLOB", num_args = 1..)]
    pub ignore_patterns: Option<Vec<String>>,

    /// Respect .gitignore, .ignore and hidden-file rules while walking.
    #[arg(short = 'g', long, action = clap::ArgAction::SetTrue)]
    pub gitignore: bool,

    /// Follow symbolic links while walking.
    #[arg(short = 'L', long, action = clap::ArgAction::SetTrue)]
    pub follow_links: bool,

    // --- Declaration Selection ---
    /// Report only these declaration categories (default: all).
    #[arg(short = 'I', long = "include", value_name = "CATEGORY", num_args = 1.., conflicts_with = "all")]
    pub include: Option<Vec<Category>>,

    /// Report every declaration category.
    #[arg(short = 'a', long, action = clap::ArgAction::SetTrue)]
    pub all: bool,

    /// Keep only declarations whose name matches any of these regexes.
    #[arg(short = 'n', long = "name-regex", value_name = "REGEX", num_args = 1..)]
    pub name_regex: Option<Vec<String>>,

    /// Drop declarations whose name matches any of these regexes.
    #[arg(short = 'N', long = "exclude-name-regex", value_name = "REGEX", num_args = 1..)]
    pub exclude_name_regex: Option<Vec<String>>,

    // --- Output ---
    /// Output format.
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write output to the specified file instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    // --- Execution Control ---
    /// Parse files in parallel.
    #[arg(short = 'j', long, action = clap::ArgAction::SetTrue)]
    pub parallel: bool,
}

/// How the scan result is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The autoload table as JSON: {"class": {...}, "constant": {...}, "function": {...}, "type": {...}}.
    Json,
    /// One "name<TAB>file" line per declared name, sorted by name.
    Names,
}
