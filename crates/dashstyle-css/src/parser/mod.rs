//! Theme parser module.

/// Theme parser implementation.
pub mod parser;

pub use parser::{
    Constants, Declaration, ParsedTheme, SelectorText, StyleRule, ThemeParser, substitute_constants,
};
