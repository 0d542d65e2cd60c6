// src/filtering/registry.rs

//! Per-category add/remove predicate lists and their compilation into one
//! resolved predicate per category.
//!
//! For a declaration `d` of category `C`:
//!
//! ```text
//! included(d) = (any(add[C], d) OR any(add[Generic], d))
//!               AND all(remove[C], d) AND all(remove[Generic], d)
//! ```
//!
//! Inclusion is opt-in: a category with no add predicates, specific or
//! generic, includes nothing.

use super::predicate::{accept_all, PredicateList};
use crate::core_types::{Category, Declaration, FilterCategory};
use log::debug;
use std::array;

/// Add and remove predicate lists for every category plus the generic slot.
///
/// The registry is append-only. `ScannerBuilder::build` consumes it and keeps
/// only the compiled form, so nothing registered afterwards can reach a
/// built scanner.
///
/// # Examples
///
/// ```
/// use defscan::core_types::{Category, Declaration, FilterCategory};
/// use defscan::filtering::FilterRegistry;
///
/// let mut registry = FilterRegistry::new();
/// registry.include_all(Category::Class);
/// registry.add(Category::Function, |d: &Declaration| d.name().starts_with('b'));
/// registry.remove(FilterCategory::Generic, |d: &Declaration| d.name().ends_with("Test"));
///
/// let filters = registry.compile();
/// assert!(filters.includes(&Declaration::new(Category::Class, "Foo", "/a.hh")));
/// assert!(!filters.includes(&Declaration::new(Category::Class, "FooTest", "/a.hh")));
/// assert!(filters.includes(&Declaration::new(Category::Function, "bar", "/b.hh")));
/// assert!(!filters.includes(&Declaration::new(Category::Function, "qux", "/b.hh")));
/// // Nobody asked for traits.
/// assert!(!filters.includes(&Declaration::new(Category::Trait, "T", "/c.hh")));
/// ```
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    add: [PredicateList<Declaration>; FilterCategory::COUNT],
    remove: [PredicateList<Declaration>; FilterCategory::COUNT],
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self {
            add: array::from_fn(|_| PredicateList::new()),
            remove: array::from_fn(|_| PredicateList::new()),
        }
    }

    /// Appends an add predicate: a declaration in `slot` is a candidate if any add predicate matches.
    pub fn add<F>(&mut self, slot: impl Into<FilterCategory>, predicate: F)
    where
        F: Fn(&Declaration) -> bool + Send + Sync + 'static,
    {
        self.add[slot.into().index()].push(predicate);
    }

    /// Appends a remove predicate: a declaration in `slot` survives only if every remove predicate accepts it.
    pub fn remove<F>(&mut self, slot: impl Into<FilterCategory>, predicate: F)
    where
        F: Fn(&Declaration) -> bool + Send + Sync + 'static,
    {
        self.remove[slot.into().index()].push(predicate);
    }

    /// Includes every declaration of `slot` unconditionally (subject to remove predicates).
    ///
    /// This installs an always-true add predicate; with [`FilterCategory::Generic`]
    /// it applies to all categories at once.
    pub fn include_all(&mut self, slot: impl Into<FilterCategory>) {
        self.add[slot.into().index()].push_shared(accept_all());
    }

    pub fn add_list(&self, slot: impl Into<FilterCategory>) -> &PredicateList<Declaration> {
        &self.add[slot.into().index()]
    }

    pub fn remove_list(&self, slot: impl Into<FilterCategory>) -> &PredicateList<Declaration> {
        &self.remove[slot.into().index()]
    }

    /// Compiles the registry into one resolved predicate per category.
    ///
    /// The result shares the registry's predicates; compiling twice yields
    /// filter sets that behave identically.
    pub fn compile(&self) -> ResolvedFilterSet {
        let generic = FilterCategory::Generic.index();
        let filters = Category::ALL.map(|category| {
            let slot = category.index();
            let filter = CompiledFilter {
                add: self.add[slot].concat(&self.add[generic]),
                remove: self.remove[slot].concat(&self.remove[generic]),
            };
            debug!(
                "Compiled {} filter: {} add predicate(s), {} remove predicate(s)",
                category,
                filter.add.len(),
                filter.remove.len()
            );
            filter
        });
        ResolvedFilterSet { filters }
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The resolved predicate of a single category.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    add: PredicateList<Declaration>,
    remove: PredicateList<Declaration>,
}

impl CompiledFilter {
    /// `true` if `declaration` passes at least one add predicate and every remove predicate.
    pub fn includes(&self, declaration: &Declaration) -> bool {
        self.add.any(declaration) && self.remove.all(declaration)
    }

    /// `true` if no declaration can ever pass, i.e. nobody included this category.
    pub fn rejects_everything(&self) -> bool {
        self.add.is_empty()
    }
}

/// One compiled predicate per real category.
///
/// Read-only once built; it is `Send + Sync` and can drive any number of
/// scans concurrently.
#[derive(Debug, Clone)]
pub struct ResolvedFilterSet {
    filters: [CompiledFilter; Category::COUNT],
}

impl ResolvedFilterSet {
    /// The compiled filter for `category`.
    pub fn filter(&self, category: Category) -> &CompiledFilter {
        &self.filters[category.index()]
    }

    /// Applies the filter matching the declaration's own category.
    pub fn includes(&self, declaration: &Declaration) -> bool {
        self.filter(declaration.category()).includes(declaration)
    }

    /// Categories that can include at least one declaration.
    pub fn active_categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(move |c| !self.filter(*c).rejects_everything())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn decl(category: Category, name: &str) -> Declaration {
        Declaration::new(category, name, "/src/file.hh")
    }

    #[test]
    fn test_empty_registry_rejects_everything() {
        let filters = FilterRegistry::new().compile();
        for category in Category::ALL {
            assert!(!filters.includes(&decl(category, "Anything")));
            assert!(filters.filter(category).rejects_everything());
        }
        assert_eq!(filters.active_categories().count(), 0);
    }

    #[test]
    fn test_remove_only_registry_still_rejects() {
        let mut registry = FilterRegistry::new();
        registry.remove(Category::Class, |_: &Declaration| true);
        registry.remove(FilterCategory::Generic, |_: &Declaration| true);
        let filters = registry.compile();
        assert!(!filters.includes(&decl(Category::Class, "Foo")));
    }

    #[test]
    fn test_generic_include_all_applies_to_every_category() {
        let mut registry = FilterRegistry::new();
        registry.include_all(FilterCategory::Generic);
        let filters = registry.compile();
        for category in Category::ALL {
            assert!(filters.includes(&decl(category, "X")));
        }
    }

    #[test]
    fn test_specific_add_does_not_leak_into_other_categories() {
        let mut registry = FilterRegistry::new();
        registry.include_all(Category::Function);
        let filters = registry.compile();
        assert!(filters.includes(&decl(Category::Function, "f")));
        assert!(!filters.includes(&decl(Category::Constant, "F")));
        assert_eq!(
            filters.active_categories().collect::<Vec<_>>(),
            vec![Category::Function]
        );
    }

    #[test]
    fn test_specific_or_generic_add() {
        let mut registry = FilterRegistry::new();
        registry.add(Category::Class, |d: &Declaration| d.name() == "Specific");
        registry.add(FilterCategory::Generic, |d: &Declaration| d.name() == "Generic");
        let filters = registry.compile();

        assert!(filters.includes(&decl(Category::Class, "Specific")));
        assert!(filters.includes(&decl(Category::Class, "Generic")));
        assert!(!filters.includes(&decl(Category::Class, "Neither")));
        // The specific add of Class does not apply to Enum, the generic one does.
        assert!(!filters.includes(&decl(Category::Enum, "Specific")));
        assert!(filters.includes(&decl(Category::Enum, "Generic")));
    }

    #[test]
    fn test_specific_and_generic_removes_both_apply() {
        let mut registry = FilterRegistry::new();
        registry.include_all(FilterCategory::Generic);
        registry.remove(Category::Class, |d: &Declaration| !d.name().starts_with('_'));
        registry.remove(FilterCategory::Generic, |d: &Declaration| !d.name().ends_with("Test"));
        let filters = registry.compile();

        assert!(filters.includes(&decl(Category::Class, "Foo")));
        assert!(!filters.includes(&decl(Category::Class, "_Foo")));
        assert!(!filters.includes(&decl(Category::Class, "FooTest")));
        assert!(filters.includes(&decl(Category::Trait, "_Foo")));
        assert!(!filters.includes(&decl(Category::Trait, "FooTest")));
    }

    #[test]
    fn test_algebra_matches_truth_table() {
        // Every combination of add/remove outcomes for specific and generic lists.
        for bits in 0u8..16 {
            let add_c = bits & 1 != 0;
            let add_g = bits & 2 != 0;
            let rem_c = bits & 4 != 0;
            let rem_g = bits & 8 != 0;

            let mut registry = FilterRegistry::new();
            registry.add(Category::Type, move |_: &Declaration| add_c);
            registry.add(FilterCategory::Generic, move |_: &Declaration| add_g);
            registry.remove(Category::Type, move |_: &Declaration| rem_c);
            registry.remove(FilterCategory::Generic, move |_: &Declaration| rem_g);

            let expected = (add_c || add_g) && rem_c && rem_g;
            assert_eq!(
                registry.compile().includes(&decl(Category::Type, "T")),
                expected,
                "add_c={} add_g={} rem_c={} rem_g={}",
                add_c,
                add_g,
                rem_c,
                rem_g
            );
        }
    }

    #[test]
    fn test_compile_is_idempotent() {
        let mut registry = FilterRegistry::new();
        registry.add(Category::Function, |d: &Declaration| d.name().len() > 3);
        registry.remove(FilterCategory::Generic, |d: &Declaration| d.name() != "blocked");

        let first = registry.compile();
        let second = registry.compile();
        for name in ["a", "long_name", "blocked", "other"] {
            let d = decl(Category::Function, name);
            assert_eq!(first.includes(&d), second.includes(&d), "{}", name);
        }
        // Compiling did not alter the registry.
        assert_eq!(registry.add_list(Category::Function).len(), 1);
        assert_eq!(registry.remove_list(FilterCategory::Generic).len(), 1);
    }

    #[test]
    fn test_predicates_see_unmodified_declaration() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut registry = FilterRegistry::new();
        registry.add(Category::Class, move |d: &Declaration| {
            counter.fetch_add(1, Ordering::SeqCst);
            d.name() == "Foo"
        });
        let filters = registry.compile();
        let d = decl(Category::Class, "Foo");
        let before = d.clone();

        assert_eq!(filters.includes(&d), filters.includes(&d));
        assert_eq!(d, before);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_later_registration_does_not_affect_compiled_set() {
        let mut registry = FilterRegistry::new();
        let compiled = registry.compile();
        registry.include_all(FilterCategory::Generic);
        assert!(!compiled.includes(&decl(Category::Class, "Foo")));
        assert!(registry.compile().includes(&decl(Category::Class, "Foo")));
    }
}
