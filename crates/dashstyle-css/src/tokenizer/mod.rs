//! Theme tokenizer module.

/// Theme token types.
pub mod token;
/// Theme tokenizer implementation.
pub mod tokenizer;

pub use token::{Token, TokenKind};
pub use tokenizer::ThemeTokenizer;
