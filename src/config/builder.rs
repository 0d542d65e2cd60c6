// src/config/builder.rs

use super::parsing::{compile_glob_vec, compile_regex_vec, normalize_extensions};
use super::validation::validate_extensions;
use super::{ScanConfig, Scanner};
use crate::cli::Cli;
use crate::core_types::{Category, Declaration, FilterCategory};
use crate::errors::Result;
use crate::filtering::{
    exclude_path_regex_filter, extension_filter, filename_regex_filter, path_regex_filter,
    FilenameChain, FilterRegistry,
};
use crate::parser::{DeclarationParser, HackParser};
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;

/// A builder for creating a [`Scanner`].
///
/// Setters take `self` and return it so calls chain. Nothing is validated
/// until [`ScannerBuilder::build`], which consumes the builder; a built
/// scanner cannot be reconfigured.
///
/// Declaration inclusion is opt-in. A builder with no `include*` call yields
/// a scanner that finds files but keeps no declarations.
///
/// # Examples
///
/// ```
/// use defscan::config::ScannerBuilder;
/// use defscan::core_types::Category;
///
/// let scanner = ScannerBuilder::new()
///     .add_path("src")
///     .extensions(vec!["hh".to_string(), "php".to_string()])
///     .include(Category::Class)
///     .include_and_filter(Category::Function, |d| d.name().starts_with('b'))
///     .filter_all(|d| !d.name().ends_with("Test"))
///     .build()
///     .unwrap();
/// assert_eq!(scanner.config().roots.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ScannerBuilder {
    roots: Vec<PathBuf>,
    chain: FilenameChain,
    extensions: Option<Vec<String>>,
    exclude_extensions: Option<Vec<String>>,
    path_regex: Option<Vec<String>>,
    exclude_path_regex: Option<Vec<String>>,
    filename_regex: Option<Vec<String>>,
    ignore_globs: Option<Vec<String>>,
    use_gitignore: bool,
    follow_links: bool,
    parallel: bool,
    registry: FilterRegistry,
    parser: Option<Arc<dyn DeclarationParser>>,
}

impl ScannerBuilder {
    /// Creates a builder with no roots, no filters and the default Hack parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from parsed command-line arguments.
    ///
    /// Categories come from `--include` (all eight when omitted). With
    /// `--name-regex`, each selected category keeps only names matching one of
    /// the regexes; `--exclude-name-regex` drops matching names everywhere.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidRegex` if a name regex does not compile.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let mut builder = Self::new()
            .add_paths(cli.roots)
            .use_gitignore(cli.gitignore)
            .follow_links(cli.follow_links)
            .parallel(cli.parallel);

        if let Some(exts) = cli.extensions {
            builder = builder.extensions(exts);
        }
        if let Some(exts) = cli.exclude_extensions {
            builder = builder.exclude_extensions(exts);
        }
        if let Some(patterns) = cli.path_regex {
            builder = builder.path_regex(patterns);
        }
        if let Some(patterns) = cli.exclude_path_regex {
            builder = builder.exclude_path_regex(patterns);
        }
        if let Some(patterns) = cli.filename_regex {
            builder = builder.filename_regex(patterns);
        }
        if let Some(patterns) = cli.ignore_patterns {
            builder = builder.ignore_globs(patterns);
        }

        let categories = match cli.include {
            Some(categories) if !cli.all => categories,
            _ => Category::ALL.to_vec(),
        };
        let name_regex = compile_regex_vec(cli.name_regex, "name")?.map(Arc::new);
        for category in categories {
            builder = match &name_regex {
                Some(regexes) => {
                    let regexes = Arc::clone(regexes);
                    builder.include_and_filter(category, move |d| {
                        regexes.iter().any(|re| re.is_match(d.name()))
                    })
                }
                None => builder.include(category),
            };
        }

        if let Some(regexes) = compile_regex_vec(cli.exclude_name_regex, "exclude name")? {
            builder = builder.filter_all(move |d| !regexes.iter().any(|re| re.is_match(d.name())));
        }

        Ok(builder)
    }

    // --- Roots ---

    /// Adds a root: a directory to walk recursively or a single file.
    pub fn add_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.roots.push(path.into());
        self
    }

    /// Adds several roots, keeping their order.
    pub fn add_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.roots.extend(paths.into_iter().map(Into::into));
        self
    }

    // --- Filename chain ---

    /// Appends a predicate to the filename chain. A file is parsed only if every predicate accepts it.
    pub fn filter_filenames<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&std::path::Path) -> bool + Send + Sync + 'static,
    {
        self.chain.push(predicate);
        self
    }

    /// Keeps only files with one of these extensions (case-insensitive, leading dot optional).
    pub fn extensions(mut self, exts: Vec<String>) -> Self {
        self.extensions = Some(exts);
        self
    }

    /// Skips files with one of these extensions.
    pub fn exclude_extensions(mut self, exts: Vec<String>) -> Self {
        self.exclude_extensions = Some(exts);
        self
    }

    /// Keeps only files whose full path matches at least one regex.
    pub fn path_regex(mut self, patterns: Vec<String>) -> Self {
        self.path_regex = Some(patterns);
        self
    }

    /// Skips files whose full path matches any regex.
    pub fn exclude_path_regex(mut self, patterns: Vec<String>) -> Self {
        self.exclude_path_regex = Some(patterns);
        self
    }

    /// Keeps only files whose name (basename) matches at least one regex.
    pub fn filename_regex(mut self, patterns: Vec<String>) -> Self {
        self.filename_regex = Some(patterns);
        self
    }

    /// Skips files and directories matching any glob.
    ///
    /// Globs are matched against paths relative to the root they were found
    /// under; a glob without `/` matches any component below the root.
    pub fn ignore_globs(mut self, patterns: Vec<String>) -> Self {
        self.ignore_globs = Some(patterns);
        self
    }

    // --- Walk behaviour ---

    /// Respects `.gitignore`, `.ignore` and hidden-file rules while walking. Off by default.
    pub fn use_gitignore(mut self, enabled: bool) -> Self {
        self.use_gitignore = enabled;
        self
    }

    /// Follows symbolic links while walking. Off by default.
    pub fn follow_links(mut self, enabled: bool) -> Self {
        self.follow_links = enabled;
        self
    }

    /// Parses files on the rayon thread pool. Results are merged in path order either way.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    // --- Declaration filters ---

    /// Includes every declaration of every category (remove filters still apply).
    pub fn include_all(mut self) -> Self {
        self.registry.include_all(FilterCategory::Generic);
        self
    }

    /// Includes every declaration of `category`.
    pub fn include(mut self, category: Category) -> Self {
        self.registry.include_all(category);
        self
    }

    /// Includes declarations of `category` that satisfy `predicate`.
    ///
    /// Calling it several times for one category includes the union.
    pub fn include_and_filter<F>(mut self, category: Category, predicate: F) -> Self
    where
        F: Fn(&Declaration) -> bool + Send + Sync + 'static,
    {
        self.registry.add(category, predicate);
        self
    }

    /// Keeps only declarations of `category` that satisfy `predicate`.
    ///
    /// This never includes anything by itself; it narrows what an
    /// `include*` call let in.
    pub fn filter<F>(mut self, category: Category, predicate: F) -> Self
    where
        F: Fn(&Declaration) -> bool + Send + Sync + 'static,
    {
        self.registry.remove(category, predicate);
        self
    }

    /// Includes declarations of any category that satisfy `predicate`.
    pub fn include_matching_all<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Declaration) -> bool + Send + Sync + 'static,
    {
        self.registry.add(FilterCategory::Generic, predicate);
        self
    }

    /// Keeps only declarations, of any category, that satisfy `predicate`.
    pub fn filter_all<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Declaration) -> bool + Send + Sync + 'static,
    {
        self.registry.remove(FilterCategory::Generic, predicate);
        self
    }

    // --- Parser ---

    /// Replaces the default [`HackParser`].
    pub fn parser(mut self, parser: impl DeclarationParser + 'static) -> Self {
        self.parser = Some(Arc::new(parser));
        self
    }

    /// Validates the options and freezes them into a [`Scanner`].
    ///
    /// Built-in filename options are compiled and appended to the filename
    /// chain after any closures, ignore globs are handed to the walker, and
    /// the filter registry is compiled.
    ///
    /// # Errors
    /// Returns `Error::Config` for conflicting or empty extensions and for
    /// regexes or globs that do not compile.
    pub fn build(self) -> Result<Scanner> {
        let extensions = normalize_extensions(self.extensions);
        let exclude_extensions = normalize_extensions(self.exclude_extensions);
        validate_extensions(extensions.as_deref(), exclude_extensions.as_deref())?;

        let path_regex = compile_regex_vec(self.path_regex, "path")?;
        let exclude_path_regex = compile_regex_vec(self.exclude_path_regex, "exclude path")?;
        let filename_regex = compile_regex_vec(self.filename_regex, "filename")?;
        let ignore_globs = compile_glob_vec(self.ignore_globs)?;

        let mut chain = self.chain;
        if extensions.is_some() || exclude_extensions.is_some() {
            chain.push_shared(extension_filter(extensions, exclude_extensions));
        }
        if let Some(regexes) = path_regex {
            chain.push_shared(path_regex_filter(regexes));
        }
        if let Some(regexes) = exclude_path_regex {
            chain.push_shared(exclude_path_regex_filter(regexes));
        }
        if let Some(regexes) = filename_regex {
            chain.push_shared(filename_regex_filter(regexes));
        }

        let filters = self.registry.compile();
        let parser = self
            .parser
            .unwrap_or_else(|| Arc::new(HackParser::new()));

        debug!(
            "Scanner built: {} root(s), {} filename predicate(s), parser '{}'",
            self.roots.len(),
            chain.len(),
            parser.name()
        );

        Ok(Scanner {
            config: ScanConfig {
                roots: self.roots,
                use_gitignore: self.use_gitignore,
                ignore_globs: ignore_globs.unwrap_or_default(),
                follow_links: self.follow_links,
                parallel: self.parallel,
            },
            chain,
            filters,
            parser,
        })
    }
}
