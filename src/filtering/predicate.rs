// src/filtering/predicate.rs

use std::fmt;
use std::sync::Arc;

/// A shareable, pure boolean test over a value of type `T`.
///
/// Predicates take a shared reference and are `Fn`, so they cannot mutate the
/// value they inspect or any state owned by the scanner. Capturing interior
/// mutability in a predicate is a caller bug; the engine may evaluate a
/// predicate any number of times, in any order.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// An ordered, append-only list of predicates over `T`.
///
/// This one type backs the filename chain (`T = Path`) and every add/remove
/// list of the category registry (`T = Declaration`).
///
/// # Examples
///
/// ```
/// use defscan::filtering::PredicateList;
///
/// let mut list: PredicateList<str> = PredicateList::new();
/// assert!(!list.any("x")); // nothing matches an empty list
/// assert!(list.all("x")); // everything passes an empty list
///
/// list.push(|s: &str| s.starts_with('a'));
/// list.push(|s: &str| s.len() > 2);
/// assert!(list.any("ab"));
/// assert!(!list.all("ab"));
/// assert!(list.all("abc"));
/// ```
pub struct PredicateList<T: ?Sized> {
    predicates: Vec<Predicate<T>>,
}

impl<T: ?Sized> PredicateList<T> {
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Appends a predicate to the end of the list.
    pub fn push<F>(&mut self, predicate: F)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Arc::new(predicate));
    }

    /// Appends an already shared predicate.
    pub fn push_shared(&mut self, predicate: Predicate<T>) {
        self.predicates.push(predicate);
    }

    /// Returns a new list holding this list's predicates followed by `other`'s.
    pub fn concat(&self, other: &PredicateList<T>) -> PredicateList<T> {
        let mut predicates = Vec::with_capacity(self.len() + other.len());
        predicates.extend(self.predicates.iter().cloned());
        predicates.extend(other.predicates.iter().cloned());
        PredicateList { predicates }
    }

    /// `true` if at least one predicate accepts `value`; `false` for an empty list.
    pub fn any(&self, value: &T) -> bool {
        self.predicates.iter().any(|p| p(value))
    }

    /// `true` if every predicate accepts `value`; `true` for an empty list.
    pub fn all(&self, value: &T) -> bool {
        self.predicates.iter().all(|p| p(value))
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl<T: ?Sized> Default for PredicateList<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Cloning shares the predicates; it does not require `T: Clone`.
impl<T: ?Sized> Clone for PredicateList<T> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for PredicateList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateList")
            .field("len", &self.predicates.len())
            .finish()
    }
}

/// Returns a predicate that accepts everything.
pub fn accept_all<T: ?Sized + 'static>() -> Predicate<T> {
    Arc::new(|_: &T| true)
}
