pub mod expression;
pub mod statement;

#[cfg(test)]
pub mod test;

use crate::ast::{Spanned, Stmt};
use crate::lexer::{Span, Token, TokenKind};

use thiserror::Error;
use tracing::debug;

use std::slice::Iter;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    /// The offending token, or `None` when input ended early.
    pub token: Option<Token>,
    pub span: Span,
}

/// Recursive-descent parser with a two-token window over the token slice.
pub struct Parser<'a> {
    tokens: Iter<'a, Token>,
    current: Option<&'a Token>,
    next: Option<&'a Token>,
    eof: Span,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let eof = tokens
            .last()
            .map(|last| Span {
                start: last.span.end,
                end: last.span.end,
                line: last.span.line,
                column: last.span.column + last.text.len(),
            })
            .unwrap_or_default();

        let mut tokens = tokens.iter();
        let current = tokens.next();
        let next = tokens.next();
        Parser {
            tokens,
            current,
            next,
            eof,
        }
    }

    pub fn parse_program(&mut self) -> Result<Vec<Spanned<Stmt>>, ParseError> {
        let mut tree = vec![];
        while self.current.is_some() {
            tree.push(self.parse_statement()?);
        }
        Ok(tree)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let eaten = self.current;
        self.current = self.next;
        self.next = self.tokens.next();
        eaten
    }

    fn at(&self, kind: TokenKind, text: &str) -> bool {
        self.current.is_some_and(|t| t.is(kind, text))
    }

    /// Consumes the current token if it is exactly `kind`/`text`.
    fn expect(&mut self, kind: TokenKind, text: &str, context: &str) -> Result<&'a Token, ParseError> {
        if self.at(kind, text) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.unexpected(&format!("'{}' {}", text, context)))
    }

    fn expect_kind(&mut self, kind: TokenKind, expected: &str) -> Result<&'a Token, ParseError> {
        match self.current {
            Some(token) if token.kind == kind => {
                self.advance();
                Ok(token)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        self.error_at(self.current, expected)
    }

    fn error_at(&self, token: Option<&Token>, expected: &str) -> ParseError {
        match token {
            Some(token) => ParseError {
                message: format!(
                    "expected {}, found {} '{}' at {}",
                    expected, token.kind, token.text, token.span
                ),
                token: Some(token.clone()),
                span: token.span,
            },
            None => ParseError {
                message: format!("expected {}, but reached end of input", expected),
                token: None,
                span: self.eof,
            },
        }
    }
}

/// Parses a whole token sequence into statements. Syntax only: names are
/// resolved afterwards by [`crate::scope::check`].
pub fn parse(tokens: &[Token]) -> Result<Vec<Spanned<Stmt>>, ParseError> {
    let tree = Parser::new(tokens).parse_program()?;
    debug!(statements = tree.len(), "parsed program");
    Ok(tree)
}
