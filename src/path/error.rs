//! Error types for field path scanning and parsing.

use std::fmt;

/// Errors that can occur while scanning or parsing a field path.
///
/// Every variant renders with an `Illegal syntax: ` prefix followed by the
/// offending fragment, so callers can surface the message to the author of
/// the path as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// The scanner was given an empty string.
    Empty,
    /// Unexpected token at a specific byte position.
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    /// Input ended while a construct was still open.
    UnexpectedEnd { position: usize, expected: String },
}

impl GrammarError {
    pub(crate) fn unexpected(position: usize, found: impl Into<String>, expected: &str) -> Self {
        GrammarError::UnexpectedToken {
            position,
            found: found.into(),
            expected: expected.to_string(),
        }
    }

    pub(crate) fn unexpected_end(position: usize, expected: &str) -> Self {
        GrammarError::UnexpectedEnd {
            position,
            expected: expected.to_string(),
        }
    }

    /// Byte offset of the violation, if it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            GrammarError::Empty => None,
            GrammarError::UnexpectedToken { position, .. }
            | GrammarError::UnexpectedEnd { position, .. } => Some(*position),
        }
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::Empty => write!(f, "Illegal syntax: empty path"),
            GrammarError::UnexpectedToken {
                position,
                found,
                expected,
            } => write!(
                f,
                "Illegal syntax: unexpected '{}' at position {}, expected {}",
                found, position, expected
            ),
            GrammarError::UnexpectedEnd { position, expected } => write!(
                f,
                "Illegal syntax: unexpected end of input at position {}, expected {}",
                position, expected
            ),
        }
    }
}

impl std::error::Error for GrammarError {}
