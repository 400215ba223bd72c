//! Field path parser.

use log::debug;

use super::error::GrammarError;
use super::scanner::{scan, Token, TokenKind};
use super::segment::{Index, Path, SegmentKind};

/// Parses a field path into a segment chain.
///
/// The empty string is valid and addresses the value stored under the empty
/// key of the root mapping.
///
/// # Errors
///
/// Returns the scanner's [`GrammarError`] unchanged, or
/// [`GrammarError::UnexpectedEnd`] if the token stream ends mid-construct.
pub fn parse(text: &str) -> Result<Path, GrammarError> {
    if text.is_empty() {
        return Ok(Path::element(Some("")));
    }

    let tokens = scan(text)?;
    let path = Parser::new(&tokens, text.len()).parse_chain()?;
    debug!("parsed field path {:?} ({} segments)", text, path.depth());
    Ok(path)
}

/// A segment under construction, linked once the whole stream is consumed.
struct Pending {
    name: Option<String>,
    kind: SegmentKind,
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    end: usize,
    pending: Vec<Pending>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], end: usize) -> Self {
        Self {
            tokens,
            position: 0,
            end,
            pending: Vec::new(),
        }
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    fn parse_chain(mut self) -> Result<Path, GrammarError> {
        self.expect_name()?;

        while let Some(token) = self.next() {
            match token.kind {
                TokenKind::Brackets => {
                    self.last_mut().kind = SegmentKind::Array(Index::Unbound);
                    self.pending.push(Pending {
                        name: None,
                        kind: SegmentKind::Element,
                    });
                }
                TokenKind::Dot => {
                    self.last_mut().kind = SegmentKind::Object;
                    self.expect_name()?;
                }
                TokenKind::Name(ref name) => {
                    return Err(GrammarError::unexpected(
                        token.position,
                        name.as_str(),
                        "'.' or '[]' between names",
                    ))
                }
            }
        }

        Ok(self.link())
    }

    /// Consumes a name token and starts a new named segment with it.
    fn expect_name(&mut self) -> Result<(), GrammarError> {
        match self.next() {
            Some(Token {
                kind: TokenKind::Name(name),
                ..
            }) => {
                self.pending.push(Pending {
                    name: Some(name.clone()),
                    kind: SegmentKind::Element,
                });
                Ok(())
            }
            Some(token) => Err(GrammarError::unexpected(
                token.position,
                token.text(),
                "a name",
            )),
            None => Err(GrammarError::unexpected_end(self.end, "a name")),
        }
    }

    fn last_mut(&mut self) -> &mut Pending {
        // expect_name always runs before any separator is consumed
        let index = self.pending.len() - 1;
        &mut self.pending[index]
    }

    fn link(self) -> Path {
        let mut next: Option<Box<Path>> = None;
        for pending in self.pending.into_iter().rev() {
            next = Some(Box::new(Path {
                name: pending.name,
                kind: pending.kind,
                next,
            }));
        }
        match next {
            Some(head) => *head,
            None => Path::element(Some("")),
        }
    }
}
