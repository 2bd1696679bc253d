use super::token::{Token, TokenKind};

/// Tokenizer for theme style files.
///
/// Comments (`/* ... */`) are dropped. An unterminated comment swallows the
/// rest of the input, as it does in CSS.
pub struct ThemeTokenizer {
    /// The input being tokenized, with the byte offset of each code point
    input: Vec<(usize, char)>,
    /// Total byte length of the input
    byte_len: usize,
    /// Current position in `input`
    position: usize,
    /// Current 1-based line
    line: usize,
    /// Collected tokens
    tokens: Vec<Token>,
}

impl ThemeTokenizer {
    /// Create a new tokenizer over `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: input.char_indices().collect(),
            byte_len: input.len(),
            position: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the whole input. The last token is always [`TokenKind::Eof`].
    pub fn run(&mut self) {
        loop {
            let token = self.consume_token();
            let is_eof = token.is_eof();
            self.tokens.push(token);
            if is_eof {
                break;
            }
        }
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn consume_token(&mut self) -> Token {
        self.consume_comments();

        let start = self.offset();
        let line = self.line;
        let Some(c) = self.consume() else {
            return Token {
                kind: TokenKind::Eof,
                span: start..start,
                line,
            };
        };

        let kind = match c {
            c if c.is_whitespace() => {
                while self.peek().is_some_and(char::is_whitespace) {
                    let _ = self.consume();
                }
                TokenKind::Whitespace
            }

            '"' | '\'' => self.consume_string(c),

            '@' if self.peek().is_some_and(is_ident_code_point) => {
                TokenKind::AtKeyword(self.consume_ident_sequence())
            }

            '#' if self.peek().is_some_and(is_ident_code_point) => {
                TokenKind::Hash(self.consume_ident_sequence())
            }

            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_number()
            }

            // ".5" is a number, ".name" is a class selector
            '.' if self.peek().is_some_and(|n| n.is_ascii_digit()) => {
                self.reconsume();
                self.consume_number()
            }

            '-' if self.peek().is_some_and(|n| n.is_ascii_digit() || n == '.') => {
                self.reconsume();
                self.consume_number()
            }

            '-' if self.peek().is_some_and(is_ident_start_code_point)
                || self.peek() == Some('-') =>
            {
                self.reconsume();
                TokenKind::Ident(self.consume_ident_sequence())
            }

            c if is_ident_start_code_point(c) => {
                self.reconsume();
                TokenKind::Ident(self.consume_ident_sequence())
            }

            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,

            other => TokenKind::Delim(other),
        };

        Token {
            kind,
            span: start..self.offset(),
            line,
        }
    }

    fn consume_comments(&mut self) {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            let _ = self.consume();
            let _ = self.consume();
            loop {
                match self.consume() {
                    Some('*') if self.peek() == Some('/') => {
                        let _ = self.consume();
                        break;
                    }
                    Some(_) => {}
                    None => return,
                }
            }
        }
    }

    fn consume_string(&mut self, ending: char) -> TokenKind {
        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => return TokenKind::BadString,
                Some(c) if c == ending => {
                    let _ = self.consume();
                    return TokenKind::String(value);
                }
                Some('\\') => {
                    let _ = self.consume();
                    match self.consume() {
                        // Escaped newline continues the string
                        Some('\n') | None => {}
                        Some(escaped) => value.push(escaped),
                    }
                }
                Some(c) => {
                    let _ = self.consume();
                    value.push(c);
                }
            }
        }
    }

    fn consume_number(&mut self) -> TokenKind {
        let mut text = String::new();
        if self.peek() == Some('-') {
            let _ = self.consume();
            text.push('-');
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                let _ = self.consume();
                text.push(c);
            } else {
                break;
            }
        }
        // Unit or percentage
        if self.peek() == Some('%') {
            let _ = self.consume();
            text.push('%');
        } else {
            while let Some(c) = self.peek().filter(|&c| is_ident_code_point(c)) {
                let _ = self.consume();
                text.push(c);
            }
        }
        TokenKind::Number(text)
    }

    fn consume_ident_sequence(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek().filter(|&c| is_ident_code_point(c)) {
            let _ = self.consume();
            name.push(c);
        }
        name
    }

    fn offset(&self) -> usize {
        self.input
            .get(self.position)
            .map_or(self.byte_len, |&(offset, _)| offset)
    }

    fn consume(&mut self) -> Option<char> {
        let &(_, c) = self.input.get(self.position)?;
        self.position += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn reconsume(&mut self) {
        if self.position > 0 {
            self.position -= 1;
            if self.input[self.position].1 == '\n' {
                self.line -= 1;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).map(|&(_, c)| c)
    }
}

/// Letters, `_`, and any non-ASCII code point may start an identifier.
pub(crate) const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Identifier continuation: start code points, digits, and `-`.
pub(crate) const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut tokenizer = ThemeTokenizer::new(input);
        tokenizer.run();
        tokenizer.into_tokens().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_number_versus_class() {
        assert_eq!(
            kinds(".5 .big"),
            vec![
                TokenKind::Number(".5".into()),
                TokenKind::Whitespace,
                TokenKind::Delim('.'),
                TokenKind::Ident("big".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spans_cover_source_text() {
        let source = "Button { color: #fff; }";
        let mut tokenizer = ThemeTokenizer::new(source);
        tokenizer.run();
        let hash = tokenizer
            .tokens()
            .iter()
            .find(|t| matches!(t.kind, TokenKind::Hash(_)))
            .unwrap();
        assert_eq!(&source[hash.span.clone()], "#fff");
    }

    #[test]
    fn test_lines_are_tracked_across_comments() {
        let mut tokenizer = ThemeTokenizer::new("/* one\ntwo */\nLabel");
        tokenizer.run();
        let ident = tokenizer
            .tokens()
            .iter()
            .find(|t| matches!(t.kind, TokenKind::Ident(_)))
            .unwrap();
        assert_eq!(ident.line, 3);
    }
}
