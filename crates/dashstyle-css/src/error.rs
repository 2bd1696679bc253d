//! Error types for theme loading, selector parsing and value conversion.
//!
//! None of these are fatal to a running shell: a broken rule is skipped, a
//! value that does not convert falls back to the property default. They are
//! surfaced so theme authors (and the `dashstyle check` command) can see them.

use std::io;
use std::path::PathBuf;

use dashstyle_actor::ValueType;
use thiserror::Error;

use crate::selector::Combinator;

/// Why a selector string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Nothing but whitespace.
    #[error("empty selector")]
    Empty,

    /// `.`, `#` or `:` not followed by a name.
    #[error("expected a name after '{0}'")]
    MissingName(char),

    /// `::name` pseudo-elements have no meaning for actors.
    #[error("pseudo-elements are not supported")]
    PseudoElement,

    /// A combinator with no compound selector on one side.
    #[error("combinator '{0}' is missing a selector on one side")]
    DanglingCombinator(Combinator),

    /// A code point that cannot appear in a selector.
    #[error("unexpected '{found}' at offset {offset}")]
    UnexpectedChar {
        /// The offending code point.
        found: char,
        /// Byte offset in the selector text.
        offset: usize,
    },
}

/// What went wrong while parsing one piece of a theme file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A selector in a rule's prelude is malformed; that selector is skipped.
    #[error("invalid selector '{text}': {error}")]
    InvalidSelector {
        /// The selector as written.
        text: String,
        /// Why it was rejected.
        #[source]
        error: SelectorError,
    },

    /// `name value;` without the colon.
    #[error("expected ':' after property '{0}'")]
    MissingColon(String),

    /// `name: ;`
    #[error("property '{0}' has an empty value")]
    EmptyValue(String),

    /// Something other than a property name where a declaration should start.
    #[error("expected a property name, found '{0}'")]
    ExpectedPropertyName(String),

    /// A value refers to `@name` which was never defined.
    #[error("undefined constant '@{0}'")]
    UndefinedConstant(String),

    /// `@name { ... }` or `@name ...;` that is not a constant definition.
    #[error("unsupported at-rule '@{0}'")]
    UnsupportedAtRule(String),

    /// A rule with declarations but no selector.
    #[error("rule has no selector")]
    MissingSelector,

    /// A token that makes no sense where it was found.
    #[error("unexpected '{0}'")]
    UnexpectedToken(String),

    /// A string literal ran into a newline or the end of input.
    #[error("unterminated string")]
    UnterminatedString,

    /// Input ended inside a construct.
    #[error("unexpected end of input in {0}")]
    UnexpectedEof(&'static str),
}

/// A parse error located in a theme source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{origin}:{line}: {kind}")]
pub struct ParseError {
    /// Name of the source (usually the file path).
    pub origin: String,
    /// 1-based line number.
    pub line: usize,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

/// A theme value that could not be converted into a property's native type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert '{value}' to {expected} for property '{property}': {reason}")]
pub struct ConversionError {
    /// Property being styled.
    pub property: String,
    /// Raw value from the theme.
    pub value: String,
    /// Type the property declared.
    pub expected: ValueType,
    /// Converter's explanation.
    pub reason: String,
}

/// Failure to locate or read a theme.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// No search path contains a theme with this name.
    #[error("theme '{0}' not found in any search path")]
    NotFound(String),

    /// A theme file could not be read.
    #[error("cannot read {path}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// `theme.json` is not valid.
    #[error("invalid theme manifest {path}")]
    Manifest {
        /// The manifest path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        error: serde_json::Error,
    },

    /// The manifest lists no style files.
    #[error("theme manifest {0} lists no style files")]
    NoStyles(PathBuf),
}
