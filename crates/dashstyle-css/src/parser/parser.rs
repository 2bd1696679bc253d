//! Theme file parser.
//!
//! Turns the token stream of one theme source into style rules whose
//! selectors and declaration values are still raw text. Errors never abort the
//! parse: the broken piece is recorded and skipped, and parsing resumes at the
//! next declaration or rule.
//!
//! Besides `selector { property: value; }` rules, theme sources may define
//! constants at the top level:
//!
//! ```text
//! @accent: #2563eb;
//! XfdashboardButton:hover { background-color: @accent; }
//! ```
//!
//! A constant is substituted into every later value that names it. The
//! constant table is shared by all sources of one style sheet.

use std::collections::HashMap;
use std::mem;

use crate::error::{ParseError, ParseErrorKind};
use crate::tokenizer::tokenizer::{is_ident_code_point, is_ident_start_code_point};
use crate::tokenizer::{ThemeTokenizer, Token, TokenKind};

/// Named constants available to declaration values.
pub type Constants = HashMap<String, String>;

/// One `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// The property name.
    pub name: String,
    /// The value with constants substituted and surrounding whitespace removed.
    pub value: String,
    /// 1-based line of the property name.
    pub line: usize,
}

/// One selector of a rule's comma-separated selector list, unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorText {
    /// Raw selector text, trimmed.
    pub text: String,
    /// 1-based line the selector starts on.
    pub line: usize,
}

/// A `selectors { declarations }` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// The selector list.
    pub selectors: Vec<SelectorText>,
    /// Declarations in source order, property names unique (last one wins).
    pub declarations: Vec<Declaration>,
    /// 1-based line of the rule's first token.
    pub line: usize,
}

/// Result of parsing one theme source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTheme {
    /// Rules in source order.
    pub rules: Vec<StyleRule>,
    /// Everything that had to be skipped.
    pub errors: Vec<ParseError>,
}

/// Theme parser over one source.
pub struct ThemeParser<'a> {
    source: &'a str,
    origin: String,
    tokens: Vec<Token>,
    position: usize,
    constants: &'a mut Constants,
    rules: Vec<StyleRule>,
    errors: Vec<ParseError>,
}

impl<'a> ThemeParser<'a> {
    /// Create a parser for `source`. `origin` names it in error messages.
    pub fn new(source: &'a str, origin: impl Into<String>, constants: &'a mut Constants) -> Self {
        let mut tokenizer = ThemeTokenizer::new(source);
        tokenizer.run();
        Self {
            source,
            origin: origin.into(),
            tokens: tokenizer.into_tokens(),
            position: 0,
            constants,
            rules: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Parse the whole source.
    #[must_use]
    pub fn parse(mut self) -> ParsedTheme {
        loop {
            self.skip_whitespace();
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::AtKeyword(name) => {
                    self.consume();
                    self.consume_at_rule(name, token.line);
                }
                TokenKind::RightBrace | TokenKind::Semicolon => {
                    self.consume();
                    self.error(token.line, ParseErrorKind::UnexpectedToken(token.kind.to_string()));
                }
                _ => self.consume_style_rule(),
            }
        }

        ParsedTheme {
            rules: self.rules,
            errors: self.errors,
        }
    }

    /// `@name: value;` defines a constant; any other at-rule is skipped.
    fn consume_at_rule(&mut self, name: String, line: usize) {
        self.skip_whitespace();

        if self.peek().kind != TokenKind::Colon {
            self.error(line, ParseErrorKind::UnsupportedAtRule(name));
            self.skip_at_rule();
            return;
        }
        self.consume();

        let value = self.consume_value();
        if value.terminated_by_eof {
            self.error(line, ParseErrorKind::UnexpectedEof("constant definition"));
        }
        if let Some(kind) = value.problem(&format!("@{name}")) {
            self.error(line, kind);
            return;
        }
        match substitute_constants(&value.text, self.constants) {
            Ok(resolved) => {
                tracing::trace!(constant = %name, value = %resolved, "defined theme constant");
                let _ = self.constants.insert(name, resolved);
            }
            Err(missing) => self.error(line, ParseErrorKind::UndefinedConstant(missing)),
        }
    }

    /// Skip an unsupported at-rule: up to and including its `;` or `{...}` block.
    fn skip_at_rule(&mut self) {
        loop {
            match self.peek().kind {
                TokenKind::Eof => return,
                TokenKind::Semicolon => {
                    self.consume();
                    return;
                }
                TokenKind::LeftBrace => {
                    self.skip_block();
                    return;
                }
                _ => self.consume(),
            }
        }
    }

    /// Skip a `{...}` block including nested blocks.
    fn skip_block(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek().kind {
                TokenKind::Eof => return,
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.consume();
                        return;
                    }
                }
                _ => {}
            }
            self.consume();
        }
    }

    fn consume_style_rule(&mut self) {
        let first_line = self.peek().line;
        let mut selectors = Vec::new();
        let mut text = String::new();
        let mut line = None;

        // Prelude: comma separated selectors up to the opening brace
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::LeftBrace => break,
                TokenKind::Eof => {
                    self.error(first_line, ParseErrorKind::UnexpectedEof("selector"));
                    return;
                }
                TokenKind::Semicolon | TokenKind::RightBrace => {
                    // Not a rule after all; drop what was collected
                    self.consume();
                    self.error(token.line, ParseErrorKind::UnexpectedToken(token.kind.to_string()));
                    return;
                }
                TokenKind::Comma => {
                    selectors.push(SelectorText {
                        text: mem::take(&mut text).trim().to_string(),
                        line: line.take().unwrap_or(token.line),
                    });
                }
                TokenKind::Whitespace => self.push_token_text(&mut text, &token),
                _ => {
                    let _ = line.get_or_insert(token.line);
                    self.push_token_text(&mut text, &token);
                }
            }
            self.consume();
        }
        let brace_line = self.peek().line;
        self.consume();
        selectors.push(SelectorText {
            text: text.trim().to_string(),
            line: line.unwrap_or(brace_line),
        });

        let declarations = self.consume_declarations();

        if selectors.iter().all(|s| s.text.is_empty()) {
            self.error(first_line, ParseErrorKind::MissingSelector);
            return;
        }

        self.rules.push(StyleRule {
            selectors,
            declarations,
            line: first_line,
        });
    }

    /// Declarations up to and including the closing brace.
    fn consume_declarations(&mut self) -> Vec<Declaration> {
        let mut declarations: Vec<Declaration> = Vec::new();

        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Whitespace | TokenKind::Semicolon => self.consume(),

                TokenKind::RightBrace => {
                    self.consume();
                    return declarations;
                }

                TokenKind::Eof => {
                    self.error(token.line, ParseErrorKind::UnexpectedEof("declaration block"));
                    return declarations;
                }

                TokenKind::Ident(name) => {
                    self.consume();
                    self.skip_whitespace();
                    if self.peek().kind != TokenKind::Colon {
                        self.error(token.line, ParseErrorKind::MissingColon(name));
                        self.skip_declaration();
                        continue;
                    }
                    self.consume();

                    let value = self.consume_value();
                    if let Some(kind) = value.problem(&name) {
                        self.error(token.line, kind);
                        continue;
                    }
                    match substitute_constants(&value.text, self.constants) {
                        Ok(resolved) => {
                            // Last write wins for repeated property names
                            declarations.retain(|d| d.name != name);
                            declarations.push(Declaration {
                                name,
                                value: resolved,
                                line: token.line,
                            });
                        }
                        Err(missing) => {
                            self.error(token.line, ParseErrorKind::UndefinedConstant(missing));
                        }
                    }
                }

                other => {
                    self.error(token.line, ParseErrorKind::ExpectedPropertyName(other.to_string()));
                    self.skip_declaration();
                }
            }
        }
    }

    /// Skip to the end of a broken declaration: past its `;`, or up to the `}`.
    fn skip_declaration(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek().kind {
                TokenKind::Eof => return,
                TokenKind::RightBrace if depth == 0 => return,
                TokenKind::Semicolon if depth == 0 => {
                    self.consume();
                    return;
                }
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.consume();
        }
    }

    /// Value text up to a top-level `;` (consumed) or `}` (left in place).
    ///
    /// The text is rebuilt from tokens, so comments inside the value are gone
    /// and whitespace runs collapse to one space. A `{` cannot start anything
    /// inside a value: the block it opens is skipped up to its matching `}`
    /// and the value is marked unusable.
    fn consume_value(&mut self) -> RawValue {
        let mut text = String::new();
        let mut depth = 0usize;
        let mut bad_string = false;
        let mut block = false;

        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Eof => {
                    return RawValue {
                        text: text.trim().to_string(),
                        bad_string,
                        block,
                        terminated_by_eof: true,
                    };
                }
                TokenKind::Semicolon | TokenKind::RightBrace if depth == 0 => {
                    if token.kind == TokenKind::Semicolon {
                        self.consume();
                    }
                    return RawValue {
                        text: text.trim().to_string(),
                        bad_string,
                        block,
                        terminated_by_eof: false,
                    };
                }
                TokenKind::LeftBrace => {
                    block = true;
                    self.skip_block();
                    continue;
                }
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                TokenKind::BadString => bad_string = true,
                _ => {}
            }
            self.push_token_text(&mut text, &token);
            self.consume();
        }
    }

    /// Append the source text of `token`; whitespace becomes a single space.
    fn push_token_text(&self, out: &mut String, token: &Token) {
        if token.kind == TokenKind::Whitespace {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
        } else {
            out.push_str(&self.source[token.span.clone()]);
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().kind == TokenKind::Whitespace {
            self.consume();
        }
    }

    fn peek(&self) -> &Token {
        // The tokenizer always ends the stream with Eof
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn consume(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn error(&mut self, line: usize, kind: ParseErrorKind) {
        self.errors.push(ParseError {
            origin: self.origin.clone(),
            line,
            kind,
        });
    }
}

/// Raw text of a declaration or constant value.
struct RawValue {
    text: String,
    bad_string: bool,
    /// A `{ ... }` block appeared in the value.
    block: bool,
    terminated_by_eof: bool,
}

impl RawValue {
    /// The error to report for this value, if it cannot be used.
    fn problem(&self, name: &str) -> Option<ParseErrorKind> {
        if self.block {
            Some(ParseErrorKind::UnexpectedToken(TokenKind::LeftBrace.to_string()))
        } else if self.bad_string {
            Some(ParseErrorKind::UnterminatedString)
        } else if self.text.is_empty() {
            Some(ParseErrorKind::EmptyValue(name.to_string()))
        } else {
            None
        }
    }
}

/// Replace every `@name` outside string literals with its definition.
///
/// # Errors
///
/// Returns the name of the first constant that is not defined.
pub fn substitute_constants(value: &str, constants: &Constants) -> Result<String, String> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
                out.push(c);
            }
            (Some(_), '\\') => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            (Some(_), c) => out.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                out.push(c);
            }
            (None, '@') if chars.peek().is_some_and(|&n| is_ident_start_code_point(n)) => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if !is_ident_code_point(n) {
                        break;
                    }
                    name.push(n);
                    let _ = chars.next();
                }
                match constants.get(&name) {
                    Some(definition) => out.push_str(definition),
                    None => return Err(name),
                }
            }
            (None, c) => out.push(c),
        }
    }

    Ok(out)
}
