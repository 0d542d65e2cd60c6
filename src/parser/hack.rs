// src/parser/hack.rs

//! The default declaration parser for Hack and PHP sources.

use super::lexer::{tokenize, Token, TokenKind};
use super::DeclarationParser;
use crate::core_types::{Category, Declaration, DeclarationSet};
use crate::errors::{ParseError, ParseErrorKind};
use log::trace;
use std::fs;
use std::path::Path;
use tracing::instrument;

/// Modifiers that may precede a top-level declaration keyword.
const MODIFIERS: &[&str] = &["abstract", "final", "async", "xhp", "sealed"];

/// Finds namespace-level declarations in Hack/PHP files.
///
/// Files must begin with a `<?hh` or `<?php` open tag (an initial shebang
/// line is allowed); files with a `.hack` extension need no tag. Any other
/// file yields an empty set. Names are qualified with the enclosing
/// namespace, e.g. `App\Models\User`.
///
/// # Examples
///
/// ```
/// use defscan::core_types::Category;
/// use defscan::parser::HackParser;
/// use std::path::Path;
///
/// let src = "<?hh\nnamespace App;\n\nfinal class User {}\nfunction helper(): void {}\n";
/// let set = HackParser::new().parse_source(Path::new("/src/User.hh"), src).unwrap();
/// assert_eq!(set.get(Category::Class)[0].name(), "App\\User");
/// assert_eq!(set.get(Category::Function)[0].name(), "App\\helper");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HackParser;

impl HackParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses already loaded source text as if it were the contents of `path`.
    pub fn parse_source(&self, path: &Path, source: &str) -> Result<DeclarationSet, ParseError> {
        let Some((body, first_line)) = strip_open_tag(path, source) else {
            trace!("No open tag, skipping '{}'", path.display());
            return Ok(DeclarationSet::new());
        };
        let tokens = tokenize(body, first_line).map_err(|kind| ParseError::new(path, kind))?;
        collect_declarations(path, &tokens).map_err(|kind| ParseError::new(path, kind))
    }
}

impl DeclarationParser for HackParser {
    #[instrument(level = "debug", skip(self), fields(path = %path.display()))]
    fn parse(&self, path: &Path) -> Result<DeclarationSet, ParseError> {
        let bytes = fs::read(path).map_err(|e| ParseError::new(path, ParseErrorKind::Io(e)))?;
        let source =
            String::from_utf8(bytes).map_err(|_| ParseError::new(path, ParseErrorKind::NotUtf8))?;
        self.parse_source(path, &source)
    }

    fn name(&self) -> &'static str {
        "hack"
    }
}

/// Returns the source after the open tag and the line it starts on, or `None`
/// if the file is not Hack/PHP.
fn strip_open_tag<'a>(path: &Path, source: &'a str) -> Option<(&'a str, usize)> {
    let is_hack_ext = path
        .extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("hack"));

    let mut rest = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut line = 1;
    if rest.starts_with("#!") {
        rest = match rest.find('\n') {
            Some(i) => &rest[i + 1..],
            None => "",
        };
        line += 1;
    }

    for tag in ["<?hh", "<?php"] {
        if let Some(after) = rest.strip_prefix(tag) {
            // The tag must end at a word boundary: "<?hhvm" is not a tag.
            if after.chars().next().map_or(true, |c| !c.is_ascii_alphanumeric()) {
                return Some((after, line));
            }
        }
    }
    is_hack_ext.then_some((rest, line))
}

fn qualify(namespace: &str, name: &str) -> String {
    let name = name.trim_start_matches('\\');
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}\\{}", namespace, name)
    }
}

/// Walks the token stream and records every declaration at namespace level.
fn collect_declarations(path: &Path, tokens: &[Token]) -> Result<DeclarationSet, ParseErrorKind> {
    let mut set = DeclarationSet::new();
    let mut namespace = String::new();
    // Depth of the braces enclosing a `namespace Foo { ... }` block, if any.
    let mut namespace_block: Option<usize> = None;
    let mut depth = 0usize;
    let mut open_lines: Vec<usize> = Vec::new();
    let mut at_statement_start = true;
    let mut i = 0;

    let record = |set: &mut DeclarationSet, category: Category, namespace: &str, name: &str| {
        let qualified = qualify(namespace, name);
        trace!("Found {} '{}' in '{}'", category, qualified, path.display());
        set.push(Declaration::new(category, qualified, path));
    };

    while i < tokens.len() {
        let token = &tokens[i];

        match &token.kind {
            TokenKind::Punct('{') => {
                depth += 1;
                open_lines.push(token.line);
                at_statement_start = true;
                i += 1;
                continue;
            }
            TokenKind::Punct('}') => {
                if depth == 0 {
                    return Err(ParseErrorKind::UnbalancedBraces { line: token.line });
                }
                depth -= 1;
                open_lines.pop();
                if namespace_block == Some(depth) {
                    namespace_block = None;
                    namespace.clear();
                }
                at_statement_start = true;
                i += 1;
                continue;
            }
            TokenKind::Punct(';') => {
                at_statement_start = true;
                i += 1;
                continue;
            }
            _ => {}
        }

        let declaration_depth = namespace_block.map_or(0, |d| d + 1);
        if !at_statement_start || depth != declaration_depth {
            i += 1;
            continue;
        }

        // Attributes: << ... >>
        if token.is_punct('<') && tokens.get(i + 1).map_or(false, |t| t.is_punct('<')) {
            i = skip_attribute(tokens, i + 2);
            continue;
        }
        // PHP attributes: #[ ... ]
        if token.is_punct('#') && tokens.get(i + 1).map_or(false, |t| t.is_punct('[')) {
            i = skip_brackets(tokens, i + 1);
            continue;
        }

        let Some(word) = token.ident() else {
            at_statement_start = false;
            i += 1;
            continue;
        };
        let keyword = word.to_ascii_lowercase();

        if MODIFIERS.contains(&keyword.as_str()) {
            i += 1;
            continue;
        }

        match keyword.as_str() {
            "namespace" => {
                let (name, next) = match tokens.get(i + 1) {
                    Some(t) => match t.ident() {
                        Some(n) => (n.trim_start_matches('\\').to_string(), i + 2),
                        None => (String::new(), i + 1),
                    },
                    None => (String::new(), i + 1),
                };
                if tokens.get(next).map_or(false, |t| t.is_punct('{')) {
                    namespace_block = Some(depth);
                }
                namespace = name;
                i = next;
                // The following '{' or ';' resets the statement start.
                continue;
            }
            "class" | "interface" | "trait" | "enum" | "newtype" | "type" => {
                let category = match keyword.as_str() {
                    "class" => Category::Class,
                    "interface" => Category::Interface,
                    "trait" => Category::Trait,
                    "enum" => Category::Enum,
                    "newtype" => Category::Newtype,
                    _ => Category::Type,
                };
                let mut name_at = i + 1;
                if category == Category::Enum
                    && tokens.get(name_at).map_or(false, |t| t.is_keyword("class"))
                {
                    // `enum class Foo` is still an enum.
                    name_at += 1;
                }
                let name = tokens
                    .get(name_at)
                    .and_then(|t| t.ident())
                    .ok_or_else(|| ParseErrorKind::MissingName {
                        keyword: keyword.clone(),
                        line: token.line,
                    })?;
                record(&mut set, category, &namespace, name);
                at_statement_start = false;
                i = name_at + 1;
            }
            "function" => {
                match tokens.get(i + 1) {
                    Some(t) if t.is_punct('&') => {
                        // function &byRef()
                        if let Some(name) = tokens.get(i + 2).and_then(|t| t.ident()) {
                            record(&mut set, Category::Function, &namespace, name);
                        }
                    }
                    Some(t) => {
                        if let Some(name) = t.ident() {
                            record(&mut set, Category::Function, &namespace, name);
                        }
                        // Otherwise an anonymous function expression; nothing to record.
                    }
                    None => {
                        return Err(ParseErrorKind::MissingName {
                            keyword,
                            line: token.line,
                        })
                    }
                }
                at_statement_start = false;
                i += 2;
            }
            "const" => {
                let (names, next) = const_names(tokens, i + 1);
                if names.is_empty() {
                    return Err(ParseErrorKind::MissingName {
                        keyword,
                        line: token.line,
                    });
                }
                for name in names {
                    record(&mut set, Category::Constant, &namespace, name);
                }
                at_statement_start = false;
                i = next;
            }
            "define" => {
                // define('NAME', value) registers a global constant by name.
                if tokens.get(i + 1).map_or(false, |t| t.is_punct('(')) {
                    if let Some(TokenKind::Str(name)) = tokens.get(i + 2).map(|t| &t.kind) {
                        record(&mut set, Category::Constant, "", name);
                    }
                }
                at_statement_start = false;
                i += 1;
            }
            _ => {
                at_statement_start = false;
                i += 1;
            }
        }
    }

    if let Some(&line) = open_lines.last() {
        return Err(ParseErrorKind::UnbalancedBraces { line });
    }
    Ok(set)
}

/// Skips an attribute list starting just after `<<`; returns the index after the closing `>>`.
fn skip_attribute(tokens: &[Token], mut i: usize) -> usize {
    while i < tokens.len() {
        if tokens[i].is_punct('>') && tokens.get(i + 1).map_or(false, |t| t.is_punct('>')) {
            return i + 2;
        }
        i += 1;
    }
    i
}

/// Skips a `[ ... ]` group starting at its `[`; returns the index after the matching `]`.
fn skip_brackets(tokens: &[Token], mut i: usize) -> usize {
    let mut nesting = 0usize;
    while i < tokens.len() {
        if tokens[i].is_punct('[') {
            nesting += 1;
        } else if tokens[i].is_punct(']') {
            nesting = nesting.saturating_sub(1);
            if nesting == 0 {
                return i + 1;
            }
        }
        i += 1;
    }
    i
}

/// Collects constant names from `const [type] A = ..., B = ...;` starting after `const`.
///
/// A name is the identifier right before a top-level `=` that is not part of
/// `==` or `=>`. Returns the names and the index of the terminating `;`.
fn const_names(tokens: &[Token], mut i: usize) -> (Vec<&str>, usize) {
    let mut names = Vec::new();
    let mut nesting = 0usize;
    while i < tokens.len() {
        let t = &tokens[i];
        match t.kind {
            TokenKind::Punct(';') if nesting == 0 => return (names, i),
            TokenKind::Punct('(' | '[' | '{') => nesting += 1,
            TokenKind::Punct(')' | ']' | '}') => {
                if nesting == 0 {
                    // Let the caller see the unmatched brace.
                    return (names, i);
                }
                nesting -= 1;
            }
            TokenKind::Punct('=') if nesting == 0 => {
                let next_is_op = tokens
                    .get(i + 1)
                    .map_or(false, |n| n.is_punct('=') || n.is_punct('>'));
                let prev_is_op = i > 0 && tokens[i - 1].is_punct('=');
                if !next_is_op && !prev_is_op {
                    if let Some(name) = i.checked_sub(1).and_then(|p| tokens[p].ident()) {
                        names.push(name);
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    (names, i)
}
