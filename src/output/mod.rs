//! The result of a scan and the views derived from it.
//!
//! A [`ScanResult`] owns the surviving declarations. Every view
//! ([`ScanResult::name_to_file`], [`ScanResult::category_table`],
//! [`ScanResult::collisions`]) borrows from it and is recomputed on demand.

use crate::core_types::{AutoloadGroup, Category, Declaration, DeclarationSet};
use crate::errors::ScanIssue;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

mod writer;

pub use writer::{setup_output_writer, write_json, write_name_map};

/// A name-to-file mapping. Keys iterate in sorted order.
pub type NameMap<'a> = BTreeMap<&'a str, &'a Path>;

/// The four-group table that drives an autoloader.
///
/// Serializes as a map of maps with the keys `class`, `constant`,
/// `function` and `type`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoloadTable<'a> {
    /// Classes, enums, interfaces and traits.
    pub class: NameMap<'a>,
    pub constant: NameMap<'a>,
    pub function: NameMap<'a>,
    /// Newtypes and type aliases.
    #[serde(rename = "type")]
    pub type_: NameMap<'a>,
}

impl<'a> AutoloadTable<'a> {
    pub fn group(&self, group: AutoloadGroup) -> &NameMap<'a> {
        match group {
            AutoloadGroup::Class => &self.class,
            AutoloadGroup::Constant => &self.constant,
            AutoloadGroup::Function => &self.function,
            AutoloadGroup::Type => &self.type_,
        }
    }

    fn group_mut(&mut self, group: AutoloadGroup) -> &mut NameMap<'a> {
        match group {
            AutoloadGroup::Class => &mut self.class,
            AutoloadGroup::Constant => &mut self.constant,
            AutoloadGroup::Function => &mut self.function,
            AutoloadGroup::Type => &mut self.type_,
        }
    }
}

/// A name whose earlier mapping was overwritten in [`ScanResult::name_to_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision<'a> {
    pub name: &'a str,
    /// A file whose declaration lost.
    pub discarded: &'a Path,
    /// The file the name finally maps to.
    pub winner: &'a Path,
}

/// Declarations that survived filtering, and the files that were scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    scanned_files: Vec<PathBuf>,
    declarations: [Vec<Declaration>; Category::COUNT],
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one file's filtered declarations.
    pub(crate) fn merge(&mut self, set: DeclarationSet) {
        for (category, declarations) in set.into_categories() {
            self.declarations[category.index()].extend(declarations);
        }
    }

    pub(crate) fn record_scanned(&mut self, path: PathBuf) {
        self.scanned_files.push(path);
    }

    /// Every file that was opened, in scan order.
    pub fn scanned_files(&self) -> &[PathBuf] {
        &self.scanned_files
    }

    /// Surviving declarations of one category, in file order then in-file order.
    pub fn declarations(&self, category: Category) -> &[Declaration] {
        &self.declarations[category.index()]
    }

    /// Every surviving declaration in merge order: category order, then file order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.declarations.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.iter().all(Vec::is_empty)
    }

    /// The distinct files that declare at least one surviving declaration.
    pub fn declared_files(&self) -> BTreeSet<&Path> {
        self.iter().map(Declaration::source_file).collect()
    }

    /// Maps every surviving name to its file; a later declaration of the same name wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use defscan::config::ScannerBuilder;
    /// use defscan::core_types::{Category, DeclarationSet};
    /// use defscan::errors::ParseError;
    /// use std::path::Path;
    /// use tempfile::tempdir;
    ///
    /// let dir = tempdir().unwrap();
    /// for name in ["x.hh", "y.hh"] {
    ///     std::fs::write(dir.path().join(name), "").unwrap();
    /// }
    /// let outcome = ScannerBuilder::new()
    ///     .add_path(dir.path())
    ///     .include_all()
    ///     .parser(|path: &Path| -> Result<DeclarationSet, ParseError> {
    ///         Ok(DeclarationSet::new().with(Category::Function, "f", path))
    ///     })
    ///     .build()
    ///     .unwrap()
    ///     .scan()
    ///     .unwrap();
    ///
    /// assert!(outcome.result.name_to_file()["f"].ends_with("y.hh"));
    /// ```
    pub fn name_to_file(&self) -> NameMap<'_> {
        let mut map = NameMap::new();
        for declaration in self.iter() {
            map.insert(declaration.name(), declaration.source_file());
        }
        map
    }

    /// Builds the four-group autoload table, last-write-wins within each group.
    pub fn category_table(&self) -> AutoloadTable<'_> {
        let mut table = AutoloadTable::default();
        for declaration in self.iter() {
            table
                .group_mut(declaration.category().group())
                .insert(declaration.name(), declaration.source_file());
        }
        table
    }

    /// Lists the overwrites behind [`ScanResult::name_to_file`].
    ///
    /// One entry per losing declaration whose file differs from the winner's.
    /// Redeclaring a name in the winning file is not reported.
    pub fn collisions(&self) -> Vec<Collision<'_>> {
        let mut files_by_name: HashMap<&str, Vec<&Path>> = HashMap::new();
        for declaration in self.iter() {
            files_by_name
                .entry(declaration.name())
                .or_default()
                .push(declaration.source_file());
        }

        let mut collisions: Vec<Collision<'_>> = files_by_name
            .into_iter()
            .filter_map(|(name, files)| {
                let (&winner, losers) = files.split_last()?;
                Some(
                    losers
                        .iter()
                        .filter(|&&file| file != winner)
                        .map(|&discarded| Collision { name, discarded, winner })
                        .collect::<Vec<_>>(),
                )
            })
            .flatten()
            .collect();
        collisions.sort_by(|a, b| (a.name, a.discarded).cmp(&(b.name, b.discarded)));
        collisions
    }
}

/// Everything a scan produces: the result plus the non-fatal issues met on the way.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub result: ScanResult,
    /// Unavailable roots first, then parse failures in file order.
    pub issues: Vec<ScanIssue>,
}
