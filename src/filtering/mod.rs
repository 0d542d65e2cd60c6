// src/filtering/mod.rs

//! Filtering for both stages of a scan.
//!
//! The filename chain decides which discovered files are parsed; the
//! category registry decides which parsed declarations survive. Both are
//! built from the same [`PredicateList`] type.

mod extension;
mod file_type;
mod filename;
mod predicate;
mod registry;

pub use extension::passes_extension_filters;
pub(crate) use file_type::{is_file_type, is_readable};
pub use filename::{
    exclude_path_regex_filter, extension_filter, filename_regex_filter, matches_ignore_glob,
    path_regex_filter, FilenameChain,
};
pub use predicate::{accept_all, Predicate, PredicateList};
pub use registry::{CompiledFilter, FilterRegistry, ResolvedFilterSet};
