//! Theme token types.
//!
//! Theme files use a small subset of CSS syntax, so the token set is a subset
//! of the CSS one. Every token remembers the byte range it came from so the
//! parser can rebuild selector and value text from the source.

use core::fmt;
use core::ops::Range;

/// The kind of a theme token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier, e.g. `XfdashboardButton`, `background-color`, `-x-custom`.
    Ident(String),
    /// `@name`, used for constants and (unsupported) at-rules.
    AtKeyword(String),
    /// `#name`, an id selector or a hex color.
    Hash(String),
    /// Quoted string with the quotes removed.
    String(String),
    /// A string that ran into a newline or the end of input.
    BadString,
    /// Number with an optional unit, e.g. `12`, `0.5`, `4px`.
    Number(String),
    /// Any other single code point, e.g. `.`, `>`, `*`, `!`.
    Delim(char),
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// One or more whitespace code points.
    Whitespace,
    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "{name}"),
            Self::AtKeyword(name) => write!(f, "@{name}"),
            Self::Hash(name) => write!(f, "#{name}"),
            Self::String(value) => write!(f, "\"{value}\""),
            Self::BadString => f.write_str("unterminated string"),
            Self::Number(text) => f.write_str(text),
            Self::Delim(c) => write!(f, "{c}"),
            Self::Colon => f.write_str(":"),
            Self::Semicolon => f.write_str(";"),
            Self::Comma => f.write_str(","),
            Self::LeftParen => f.write_str("("),
            Self::RightParen => f.write_str(")"),
            Self::LeftBrace => f.write_str("{"),
            Self::RightBrace => f.write_str("}"),
            Self::Whitespace => f.write_str("whitespace"),
            Self::Eof => f.write_str("end of input"),
        }
    }
}

/// A token together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What was found.
    pub kind: TokenKind,
    /// Byte range in the source text.
    pub span: Range<usize>,
    /// 1-based line of the first code point.
    pub line: usize,
}

impl Token {
    /// Whether this is the end-of-input token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
