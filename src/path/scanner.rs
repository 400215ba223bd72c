//! Field path tokenizer.
//!
//! Splits a path such as `object.array[].field` into `NAME`, `.` and `[]`
//! lexemes, rejecting any construct the grammar does not allow. Scanning stops
//! at the first violation.

use std::fmt;

use super::error::GrammarError;

/// Kind of a lexeme produced by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// One or more identifier characters.
    Name(String),
    /// The `.` separator.
    Dot,
    /// The `[]` wildcard marker.
    Brackets,
}

/// A lexeme and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl Token {
    /// Returns the source text of the lexeme.
    pub fn text(&self) -> &str {
        match &self.kind {
            TokenKind::Name(name) => name,
            TokenKind::Dot => ".",
            TokenKind::Brackets => "[]",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Returns true for characters allowed inside a name.
pub(crate) fn is_name_char(ch: char) -> bool {
    !matches!(ch, '.' | '[' | ']')
}

/// Tokenizes a field path.
///
/// # Errors
///
/// Returns a [`GrammarError`] for empty input, a leading `.` or `[]`, doubled or
/// trailing dots, brackets with content, unbalanced brackets, and `[]` directly
/// followed by a name.
pub fn scan(input: &str) -> Result<Vec<Token>, GrammarError> {
    if input.is_empty() {
        return Err(GrammarError::Empty);
    }
    Scanner::new(input).run()
}

struct Scanner<'a> {
    input: &'a str,
    position: usize,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, GrammarError> {
        while let Some(ch) = self.peek() {
            let start = self.position;
            let kind = match ch {
                '.' => self.scan_dot(start)?,
                '[' => self.scan_brackets(start)?,
                ']' => return Err(GrammarError::unexpected(start, "]", "'[' before ']'")),
                _ => self.scan_name(),
            };
            self.tokens.push(Token {
                kind,
                position: start,
            });
        }
        Ok(self.tokens)
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Advances past the current character.
    fn bump(&mut self) {
        if let Some(ch) = self.peek() {
            self.position += ch.len_utf8();
        }
    }

    fn previous(&self) -> Option<&TokenKind> {
        self.tokens.last().map(|token| &token.kind)
    }

    fn scan_dot(&mut self, start: usize) -> Result<TokenKind, GrammarError> {
        if !matches!(
            self.previous(),
            Some(TokenKind::Name(_)) | Some(TokenKind::Brackets)
        ) {
            return Err(GrammarError::unexpected(start, ".", "a name before '.'"));
        }
        self.bump();

        match self.peek() {
            Some(ch) if is_name_char(ch) => Ok(TokenKind::Dot),
            Some(ch) => Err(GrammarError::unexpected(
                self.position,
                ch.to_string(),
                "a name after '.'",
            )),
            None => Err(GrammarError::unexpected_end(self.position, "a name after '.'")),
        }
    }

    fn scan_brackets(&mut self, start: usize) -> Result<TokenKind, GrammarError> {
        if self.previous().is_none() {
            return Err(GrammarError::unexpected(start, "[", "a name before '[]'"));
        }
        self.bump();

        match self.peek() {
            Some(']') => self.bump(),
            Some(ch) => {
                return Err(GrammarError::unexpected(
                    self.position,
                    ch.to_string(),
                    "']'",
                ))
            }
            None => return Err(GrammarError::unexpected_end(self.position, "']'")),
        }

        match self.peek() {
            None | Some('.') | Some('[') => Ok(TokenKind::Brackets),
            Some(ch) => Err(GrammarError::unexpected(
                self.position,
                ch.to_string(),
                "'.', '[]' or end of input after '[]'",
            )),
        }
    }

    fn scan_name(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if !is_name_char(ch) {
                break;
            }
            self.bump();
        }
        TokenKind::Name(self.input[start..self.position].to_string())
    }
}
