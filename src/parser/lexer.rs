// src/parser/lexer.rs

//! A small tokenizer for Hack/PHP source.
//!
//! It only knows enough to find declarations: identifiers, variables,
//! string literals and single-character punctuation. Comments and whitespace
//! are dropped; numbers and XHP elements collapse to `Other`.

use crate::errors::ParseErrorKind;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum TokenKind {
    /// Identifier or keyword, possibly namespace-qualified (`Foo\Bar`).
    Ident(String),
    /// `$name`
    Variable,
    /// Contents of a quoted string, heredoc or nowdoc.
    Str(String),
    Punct(char),
    /// Numeric literal or a whole XHP element.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Token {
    pub kind: TokenKind,
    /// 1-based line of the token's first character.
    pub line: usize,
}

impl Token {
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(s) => Some(s),
            _ => None,
        }
    }

    /// Case-insensitive keyword test; Hack keywords are case-insensitive.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.ident().map_or(false, |s| s.eq_ignore_ascii_case(keyword))
    }
}

#[inline]
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '\\' || !c.is_ascii()
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '\\' || !c.is_ascii()
}

/// Keywords after which a `<` opens an XHP element rather than a comparison.
const XHP_KEYWORDS: &[&str] = &["return", "yield", "print", "echo", "await"];

struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    /// Kind of the last token returned.
    prev: Option<TokenKind>,
    /// Whether `prev` is the `>` of a `=>`.
    after_arrow: bool,
}

impl<'a> Lexer<'a> {
    fn bump(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Looks `n` characters past the current one without consuming anything.
    fn peek_nth(&self, n: usize) -> Option<char> {
        let mut it = self.chars.clone();
        it.nth(n).map(|(_, c)| c)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self, start_line: usize) -> Result<(), ParseErrorKind> {
        // The opening "/*" has been consumed.
        let mut prev_star = false;
        while let Some(c) = self.bump() {
            if prev_star && c == '/' {
                return Ok(());
            }
            prev_star = c == '*';
        }
        Err(ParseErrorKind::UnterminatedLiteral { line: start_line })
    }

    fn quoted(&mut self, quote: char, start_line: usize) -> Result<String, ParseErrorKind> {
        // The opening quote has been consumed.
        let mut out = String::new();
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    if let Some(escaped) = self.bump() {
                        // Single-quoted strings only unescape quotes and backslashes.
                        if quote == '\'' && escaped != '\'' && escaped != '\\' {
                            out.push('\\');
                        }
                        out.push(escaped);
                    }
                }
                c if c == quote => return Ok(out),
                c => out.push(c),
            }
        }
        Err(ParseErrorKind::UnterminatedLiteral { line: start_line })
    }

    fn heredoc(&mut self, start_line: usize) -> Result<String, ParseErrorKind> {
        // "<<<" has been consumed.
        self.take_while(|c| c == ' ' || c == '\t');
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => {
                self.bump();
                Some(q)
            }
            _ => None,
        };
        let label = self.take_while(is_ident_char);
        if label.is_empty() {
            return Err(ParseErrorKind::UnterminatedLiteral { line: start_line });
        }
        if let Some(q) = quote {
            if self.peek() == Some(q) {
                self.bump();
            }
        }
        self.skip_line_comment();

        let mut body = String::new();
        loop {
            if self.bump().is_none() {
                return Err(ParseErrorKind::UnterminatedLiteral { line: start_line });
            }
            let indent = self.take_while(|c| c == ' ' || c == '\t');
            if self.at_label(&label) {
                for _ in label.chars() {
                    self.bump();
                }
                return Ok(body);
            }
            let line = self.take_while(|c| c != '\n');
            body.push_str(&indent);
            body.push_str(&line);
            body.push('\n');
        }
    }

    /// `true` if the upcoming characters are exactly `label`, not followed by an identifier character.
    fn at_label(&self, label: &str) -> bool {
        let mut upcoming = self.chars.clone().map(|(_, c)| c);
        label.chars().all(|l| upcoming.next() == Some(l))
            && !upcoming.next().map_or(false, is_ident_char)
    }

    /// Whether the previous token leaves the lexer in expression position,
    /// where `<tag` starts an XHP element.
    fn xhp_may_start(&self) -> bool {
        match &self.prev {
            Some(TokenKind::Punct('>')) => self.after_arrow,
            Some(TokenKind::Punct(c)) => "(=,?:[{;!&|.".contains(*c),
            Some(TokenKind::Ident(word)) => {
                XHP_KEYWORDS.iter().any(|k| word.eq_ignore_ascii_case(k))
            }
            _ => false,
        }
    }

    /// `true` if the upcoming characters are `<` followed by a tag name.
    fn at_xhp_tag(&self) -> bool {
        self.peek_nth(0) == Some('<')
            && self.peek_nth(1).map_or(false, |c| c.is_ascii_alphabetic() || c == ':')
    }

    /// Consumes an XHP element starting at its `<`, including children and
    /// the closing tag. Text inside the element is not Hack code.
    fn xhp_element(&mut self, start_line: usize) -> Result<(), ParseErrorKind> {
        let unterminated = ParseErrorKind::UnterminatedLiteral { line: start_line };
        self.bump();
        self.take_while(|c| is_ident_char(c) || c == ':' || c == '-');

        // Attributes, up to `>` or `/>`.
        loop {
            match self.bump() {
                None => return Err(unterminated),
                Some('/') if self.peek() == Some('>') => {
                    self.bump();
                    return Ok(());
                }
                Some('>') => break,
                Some(q @ ('"' | '\'')) => {
                    let line = self.line;
                    self.quoted(q, line)?;
                }
                Some('{') => self.xhp_expression(start_line)?,
                Some(_) => {}
            }
        }

        // Children, up to the closing tag.
        loop {
            match self.peek() {
                None => return Err(unterminated),
                Some('<') if self.peek_nth(1) == Some('/') => {
                    while let Some(c) = self.bump() {
                        if c == '>' {
                            return Ok(());
                        }
                    }
                    return Err(unterminated);
                }
                Some('<') if self.at_xhp_tag() => {
                    let line = self.line;
                    self.xhp_element(line)?;
                }
                Some('{') => {
                    self.bump();
                    self.xhp_expression(start_line)?;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    /// Lexes an embedded `{ ... }` expression; the opening brace has been consumed.
    fn xhp_expression(&mut self, start_line: usize) -> Result<(), ParseErrorKind> {
        self.prev = Some(TokenKind::Punct('{'));
        let mut depth = 1usize;
        while let Some(token) = self.next_token()? {
            match token.kind {
                TokenKind::Punct('{') => depth += 1,
                TokenKind::Punct('}') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(ParseErrorKind::UnterminatedLiteral { line: start_line })
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseErrorKind> {
        let token = self.lex_token()?;
        if let Some(t) = &token {
            self.after_arrow =
                t.kind == TokenKind::Punct('>') && self.prev == Some(TokenKind::Punct('='));
            self.prev = Some(t.kind.clone());
        }
        Ok(token)
    }

    fn lex_token(&mut self) -> Result<Option<Token>, ParseErrorKind> {
        loop {
            let Some(c) = self.peek() else {
                return Ok(None);
            };
            let line = self.line;

            if c.is_whitespace() {
                self.bump();
                continue;
            }

            match c {
                '/' if self.peek_nth(1) == Some('/') => {
                    self.skip_line_comment();
                }
                '/' if self.peek_nth(1) == Some('*') => {
                    self.bump();
                    self.bump();
                    self.skip_block_comment(line)?;
                }
                '#' if self.peek_nth(1) != Some('[') => {
                    self.skip_line_comment();
                }
                '\'' | '"' | '`' => {
                    self.bump();
                    let s = self.quoted(c, line)?;
                    return Ok(Some(Token { kind: TokenKind::Str(s), line }));
                }
                '<' if self.peek_nth(1) == Some('<') && self.peek_nth(2) == Some('<') => {
                    self.bump();
                    self.bump();
                    self.bump();
                    let s = self.heredoc(line)?;
                    return Ok(Some(Token { kind: TokenKind::Str(s), line }));
                }
                '<' if self.at_xhp_tag() && self.xhp_may_start() => {
                    self.xhp_element(line)?;
                    return Ok(Some(Token { kind: TokenKind::Other, line }));
                }
                '$' if self.peek_nth(1).map_or(false, is_ident_start) => {
                    self.bump();
                    self.take_while(is_ident_char);
                    return Ok(Some(Token { kind: TokenKind::Variable, line }));
                }
                c if c.is_ascii_digit() => {
                    self.take_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
                    return Ok(Some(Token { kind: TokenKind::Other, line }));
                }
                c if is_ident_start(c) => {
                    let ident = self.take_while(is_ident_char);
                    return Ok(Some(Token { kind: TokenKind::Ident(ident), line }));
                }
                c => {
                    self.bump();
                    return Ok(Some(Token { kind: TokenKind::Punct(c), line }));
                }
            }
        }
    }
}

/// Tokenizes `src`, whose first character is on line `first_line`.
pub(super) fn tokenize(src: &str, first_line: usize) -> Result<Vec<Token>, ParseErrorKind> {
    let mut lexer = Lexer {
        src,
        chars: src.char_indices().peekable(),
        line: first_line,
        prev: None,
        after_arrow: false,
    };
    let mut tokens = Vec::with_capacity(lexer.src.len() / 4);
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}
