//! The boundary to the declaration parser.
//!
//! The scanner never reads source syntax itself. It hands each selected file
//! to a [`DeclarationParser`] and filters whatever comes back. [`HackParser`]
//! is the default; any closure with the right signature can stand in for it.

use crate::core_types::DeclarationSet;
use crate::errors::ParseError;
use std::fmt;
use std::path::Path;

mod hack;
mod lexer;

pub use hack::HackParser;

/// Extracts the declarations of one file.
///
/// Implementations must be deterministic for a given file content and must
/// report failures as `Err` rather than returning a partial set; the scanner
/// then records the failure and treats the file as declaring nothing.
///
/// # Examples
///
/// A closure works as a parser, which is convenient for fixtures:
///
/// ```
/// use defscan::core_types::{Category, DeclarationSet};
/// use defscan::errors::ParseError;
/// use defscan::parser::DeclarationParser;
/// use std::path::Path;
///
/// let parser = |path: &Path| -> Result<DeclarationSet, ParseError> {
///     Ok(DeclarationSet::new().with(Category::Function, "main", path))
/// };
/// let set = parser.parse(Path::new("/bin/main.hh")).unwrap();
/// assert_eq!(set.get(Category::Function)[0].name(), "main");
/// ```
pub trait DeclarationParser: Send + Sync {
    /// Parses the file at `path`.
    fn parse(&self, path: &Path) -> Result<DeclarationSet, ParseError>;

    /// Returns a descriptive name for the parser.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> DeclarationParser for F
where
    F: Fn(&Path) -> Result<DeclarationSet, ParseError> + Send + Sync,
{
    fn parse(&self, path: &Path) -> Result<DeclarationSet, ParseError> {
        self(path)
    }
}

// Implement Debug manually for Box<dyn DeclarationParser> by using the name method.
impl fmt::Debug for dyn DeclarationParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeclarationParser").field(&self.name()).finish()
    }
}
