//! Defines core data structures used throughout the scanning pipeline.
//!
//! `Declaration` is what a parser produces, `Category` tags what kind of
//! declaration it is, and `DeclarationSet` groups one file's declarations by
//! category.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The kind of a declaration.
///
/// The declaration order of the variants is the order in which categories
/// are merged into the name-to-file view, so it is part of the
/// last-write-wins contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Class,
    Constant,
    Enum,
    Function,
    Interface,
    Newtype,
    Trait,
    Type,
}

impl Category {
    /// Number of declaration categories.
    pub const COUNT: usize = 8;

    /// All categories, in merge order.
    pub const ALL: [Category; Category::COUNT] = [
        Category::Class,
        Category::Constant,
        Category::Enum,
        Category::Function,
        Category::Interface,
        Category::Newtype,
        Category::Trait,
        Category::Type,
    ];

    /// Position of this category in [`Category::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name, as used on the command line and in output keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Class => "class",
            Category::Constant => "constant",
            Category::Enum => "enum",
            Category::Function => "function",
            Category::Interface => "interface",
            Category::Newtype => "newtype",
            Category::Trait => "trait",
            Category::Type => "type",
        }
    }

    /// The autoload group this category is published under.
    pub fn group(self) -> AutoloadGroup {
        match self {
            Category::Class | Category::Enum | Category::Interface | Category::Trait => {
                AutoloadGroup::Class
            }
            Category::Newtype | Category::Type => AutoloadGroup::Type,
            Category::Function => AutoloadGroup::Function,
            Category::Constant => AutoloadGroup::Constant,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown category '{}', expected one of: class, constant, enum, function, interface, newtype, trait, type",
                    s
                )
            })
    }
}

/// The four groups of the autoload table.
///
/// Class-like and type-like identifiers live in the type namespace of the
/// loader; functions and constants are value identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutoloadGroup {
    Class,
    Type,
    Function,
    Constant,
}

/// Key of the filter registry: a real category, or the cross-cutting
/// generic slot whose predicates apply to every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCategory {
    Generic,
    Specific(Category),
}

impl FilterCategory {
    /// Number of registry slots (8 categories + generic).
    pub const COUNT: usize = Category::COUNT + 1;

    /// Slot index in the registry. Generic takes the last slot.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            FilterCategory::Specific(c) => c.index(),
            FilterCategory::Generic => Category::ALL.len(),
        }
    }
}

impl From<Category> for FilterCategory {
    fn from(category: Category) -> Self {
        FilterCategory::Specific(category)
    }
}

/// One named declaration found in a source file.
///
/// Names are not globally unique; two files may declare the same name.
///
/// # Examples
///
/// ```
/// use defscan::core_types::{Category, Declaration};
///
/// let decl = Declaration::new(Category::Class, "App\\Foo", "/src/Foo.hh");
/// assert_eq!(decl.name(), "App\\Foo");
/// assert_eq!(decl.source_file().to_str(), Some("/src/Foo.hh"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Declaration {
    category: Category,
    name: String,
    source_file: PathBuf,
}

impl Declaration {
    pub fn new(
        category: Category,
        name: impl Into<String>,
        source_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            category,
            name: name.into(),
            source_file: source_file.into(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file that declares this entity.
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }
}

/// The declarations one file yields, grouped by category.
///
/// Within each category the declarations keep the order the parser found
/// them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationSet {
    by_category: [Vec<Declaration>; Category::COUNT],
}

impl DeclarationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a declaration to its category's list.
    pub fn push(&mut self, declaration: Declaration) {
        self.by_category[declaration.category().index()].push(declaration);
    }

    /// Builder-style variant of [`DeclarationSet::push`] for fixtures.
    pub fn with(mut self, category: Category, name: &str, source_file: impl Into<PathBuf>) -> Self {
        self.push(Declaration::new(category, name, source_file));
        self
    }

    pub fn get(&self, category: Category) -> &[Declaration] {
        &self.by_category[category.index()]
    }

    pub fn len(&self) -> usize {
        self.by_category.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.iter().all(Vec::is_empty)
    }

    /// Consumes the set, yielding each category with its declarations in merge order.
    pub fn into_categories(self) -> impl Iterator<Item = (Category, Vec<Declaration>)> {
        Category::ALL.into_iter().zip(self.by_category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_index_matches_all_order() {
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
        assert_eq!(Category::ALL.len(), Category::COUNT);
        assert_eq!(FilterCategory::Generic.index(), Category::COUNT);
        assert_eq!(FilterCategory::COUNT, 9);
    }

    #[test]
    fn test_category_from_str_is_case_insensitive() {
        assert_eq!("Class".parse::<Category>(), Ok(Category::Class));
        assert_eq!(" newtype ".parse::<Category>(), Ok(Category::Newtype));
        assert!("struct".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_groups() {
        assert_eq!(Category::Enum.group(), AutoloadGroup::Class);
        assert_eq!(Category::Trait.group(), AutoloadGroup::Class);
        assert_eq!(Category::Newtype.group(), AutoloadGroup::Type);
        assert_eq!(Category::Function.group(), AutoloadGroup::Function);
        assert_eq!(Category::Constant.group(), AutoloadGroup::Constant);
    }

    #[test]
    fn test_declaration_set_groups_by_category() {
        let set = DeclarationSet::new()
            .with(Category::Function, "b", "/x.hh")
            .with(Category::Class, "A", "/x.hh")
            .with(Category::Function, "a", "/x.hh");

        assert_eq!(set.len(), 3);
        let names: Vec<_> = set.get(Category::Function).iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(set.get(Category::Trait).is_empty());

        let order: Vec<_> = set
            .into_categories()
            .filter(|(_, decls)| !decls.is_empty())
            .map(|(c, _)| c)
            .collect();
        assert_eq!(order, vec![Category::Class, Category::Function]);
    }
}
