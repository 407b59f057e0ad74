//! Lexer for literal listings: whitespace separated `True`, `False`, `None`,
//! decimal integers and double quoted strings, with `#` line comments.
use crate::constants::Literal;
use crate::error::{self, SourceMetadata, Span};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected {0:?}")]
    UnexpectedChar(char),
    #[error("unexpected {found:?}\nexpected {wanted}")]
    Expected { wanted: &'static str, found: char },
    #[error("integer literal `{0}` does not fit in 32 bits")]
    IntegerOutOfRange(String),
    #[error("unknown escape sequence `\\{0}`")]
    UnknownEscape(char),
    #[error("string literal is missing its closing quote")]
    UnterminatedString,
    #[error("unknown keyword `{0}`, expected `True`, `False` or `None`")]
    UnknownKeyword(String),
}

pub type LexError = error::Error<LexErrorKind>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source<'source> {
    pub span: Span,
    pub source: &'source str,
}

impl From<Source<'_>> for Span {
    fn from(s: Source<'_>) -> Self {
        s.span
    }
}

/// A literal together with the text it was lexed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub literal: Literal,
    pub source: Source<'a>,
}

pub struct Lexer<'a> {
    input: std::iter::Peekable<std::str::CharIndices<'a>>,
    metadata: &'a SourceMetadata<'a>,
}

pub struct LexerIter<'a> {
    lexer: Lexer<'a>,
    eof: bool,
}

impl<'a> Iterator for LexerIter<'a> {
    type Item = Result<Token<'a>, LexError>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.eof {
            None
        } else {
            let next = self.lexer.next_token();
            if matches!(next, Ok(None) | Err(_)) {
                self.eof = true;
            }
            next.transpose()
        }
    }
}

impl<'a> std::iter::FusedIterator for LexerIter<'a> {}

impl<'a> IntoIterator for Lexer<'a> {
    type IntoIter = LexerIter<'a>;
    type Item = <Self::IntoIter as Iterator>::Item;
    fn into_iter(self) -> Self::IntoIter {
        LexerIter {
            lexer: self,
            eof: false,
        }
    }
}

impl<'source> Lexer<'source> {
    pub fn new(input: &'source SourceMetadata<'source>) -> Self {
        Self {
            input: input.input().char_indices().peekable(),
            metadata: input,
        }
    }

    /// Lexes the whole input, stopping at the first error.
    pub fn literals(self) -> Result<Vec<Literal>, LexError> {
        self.into_iter()
            .map(|token| token.map(|token| token.literal))
            .collect()
    }

    pub fn next_token(&mut self) -> Result<Option<Token<'source>>, LexError> {
        self.skip_trivia();
        let token = if let Some(src) = self.keyword() {
            let literal = match src.source {
                "True" => Literal::Boolean(true),
                "False" => Literal::Boolean(false),
                "None" => Literal::None,
                other => {
                    return Err(self.error(
                        src.span.offset,
                        LexErrorKind::UnknownKeyword(other.to_string()),
                    ))
                }
            };
            Token { literal, source: src }
        } else if let Some(token) = self.string().map_err(|e| e.add_context("string"))? {
            token
        } else if let Some(token) = self.integer().map_err(|e| e.add_context("integer"))? {
            token
        } else {
            return match self.input.peek().copied() {
                None => Ok(None),
                Some((pos, ch)) => Err(self.error(pos, LexErrorKind::UnexpectedChar(ch))),
            };
        };
        tracing::trace!(target: "lexer", "lexed {} at {:?}", token.literal, token.source.span);
        self.expect_delimiter()?;
        Ok(Some(token))
    }

    fn keyword(&mut self) -> Option<Source<'source>> {
        let (start, _) = self.skip_if(|c| c.is_ascii_alphabetic() || c == '_')?;
        self.skip_while(|c| c.is_ascii_alphanumeric() || c == '_');
        Some(self.source_until_current(start))
    }

    fn integer(&mut self) -> Result<Option<Token<'source>>, LexError> {
        let start = self.current_offset();
        let negative = self.skip_if(|c| c == '-').is_some();
        if self.skip_if(|c| c.is_ascii_digit()).is_none() {
            if !negative {
                return Ok(None);
            }
            return match self.input.peek().copied() {
                Some((pos, found)) => Err(self.error(
                    pos,
                    LexErrorKind::Expected {
                        wanted: "digit after '-'",
                        found,
                    },
                )),
                None => Err(self.error(start, LexErrorKind::UnexpectedChar('-'))),
            };
        }
        self.skip_while(|c| c.is_ascii_digit());
        let source = self.source_until_current(start);
        let value = source.source.parse::<i32>().map_err(|_| {
            self.error(
                start,
                LexErrorKind::IntegerOutOfRange(source.source.to_string()),
            )
        })?;
        Ok(Some(Token {
            literal: Literal::Integer(value),
            source,
        }))
    }

    fn string(&mut self) -> Result<Option<Token<'source>>, LexError> {
        let (start, _) = match self.skip_if(|c| c == '"') {
            Some(found) => found,
            None => return Ok(None),
        };
        let mut value = String::new();
        loop {
            match self.input.next() {
                Some((_, '"')) => break,
                Some((pos, '\\')) => match self.input.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, '"')) => value.push('"'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, other)) => {
                        return Err(self.error(pos, LexErrorKind::UnknownEscape(other)))
                    }
                    None => return Err(self.error(start, LexErrorKind::UnterminatedString)),
                },
                Some((_, '\n')) | None => {
                    return Err(self.error(start, LexErrorKind::UnterminatedString))
                }
                Some((_, ch)) => value.push(ch),
            }
        }
        Ok(Some(Token {
            literal: Literal::String(value),
            source: self.source_until_current(start),
        }))
    }

    fn expect_delimiter(&mut self) -> Result<(), LexError> {
        match self.input.peek().copied() {
            Some((pos, found)) if !is_delimiter(found) => Err(self.error(
                pos,
                LexErrorKind::Expected {
                    wanted: "whitespace or comment after literal",
                    found,
                },
            )),
            _ => Ok(()),
        }
    }

    fn skip_while<F>(&mut self, filter: F)
    where
        F: Fn(char) -> bool,
    {
        while self.input.peek().filter(|(_, ch)| filter(*ch)).is_some() {
            self.input.next();
        }
    }

    fn skip_if<F>(&mut self, filter: F) -> Option<(usize, char)>
    where
        F: Fn(char) -> bool,
    {
        let (pos, ch) = *self.input.peek()?;
        if filter(ch) {
            self.input.next();
            Some((pos, ch))
        } else {
            None
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            self.skip_while(char::is_whitespace);
            if self.skip_if(|c| c == '#').is_none() {
                break;
            }
            self.skip_while(|c| c != '\n');
        }
    }

    fn source_until_current(&mut self, start: usize) -> Source<'source> {
        let end = self.current_offset();
        let span = Span {
            offset: start,
            len: end - start,
        };
        Source {
            span,
            source: &self.metadata.input()[span.as_range()],
        }
    }

    fn error(&self, position: usize, kind: LexErrorKind) -> LexError {
        LexError::new(kind).with_source(Span::new(position), self.metadata)
    }

    fn current_offset(&mut self) -> usize {
        self.input
            .peek()
            .map(|(x, _)| *x)
            .unwrap_or_else(|| self.metadata.input().len())
    }
}

#[inline]
fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || ch == '#'
}
